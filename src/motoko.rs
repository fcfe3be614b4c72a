//! The Motoko support patch set for `devefi_ledger_tests/common.ts`.
//!
//! Six ordered patches that teach the harness to drive the PanIndustrial
//! Motoko ICRC_fungible ledger alongside the default DFINITY ledger, selected
//! at runtime through the `LEDGER` environment variable. The engine is
//! generic; this module is a fixed, hand-authored configuration over it, and
//! every replacement is a literal template rather than derived text.
//!
//! Ordering is significant: patches 5 and 6 rewrite the exported constructor
//! and upgrade functions to reference the import, selector, WASM path, and
//! init-args function inserted by patches 1-4.

use crate::matcher::PatternError;
use crate::patch::{Guard, Patch};

/// Marker for the overall feature: present iff the selector export (patch 2)
/// has ever landed in the harness. The run verdict treats its presence as
/// success even when nothing applied this run.
pub const FEATURE_MARKER: &str = "LEDGER_IMPL";

// 1. Motoko IDL import, inserted after the ICP ledger import.
const IMPORT_PRECONDITION: &str =
    r#"(import \{ _SERVICE as ICPLedgerService.*?from ['"]\./icp_ledger/ledger\.idl['"];?)"#;

const IMPORT_TEMPLATE: &str = r#"${1}
// Motoko ICRC_fungible ledger support
import { idlFactory as MotokoLedgerIdlFactory, init as motokoInit } from './icrc_ledger/motoko_ledger.idl.js';"#;

// 2. LEDGER_IMPL selector export, inserted after the LEDGER_TYPE export.
const SELECTOR_PRECONDITION: &str =
    r#"(export const LEDGER_TYPE\s*=\s*process\.env\[['"]LEDGER_TYPE['"]\]\s*as\s*["']icrc["'].*?;)"#;

const SELECTOR_TEMPLATE: &str = r#"${1}
// Support for multiple ledger implementations: "dfinity" (default) or "motoko"
export const LEDGER_IMPL = process.env['LEDGER'] as "dfinity" | "motoko" | undefined;"#;

// 3. Dual WASM path constants, replacing the single-path block and its
//    env-var conditional. The Motoko build ships gzipped.
const WASM_PATHS_PRECONDITION: &str = concat!(
    r#"let ICRC_WASM_PATH\s*=\s*resolve\(__dirname,\s*["']\./icrc_ledger/ledger\.wasm["']\);"#,
    r#"[\s\S]*?if\s*\(process\.env\[['"]LEDGER['"]\]\s*===\s*["']motoko["']\)\s*\{"#,
    r#"[\s\S]*?ICRC_WASM_PATH\s*=\s*resolve\(__dirname,\s*["']\./icrc_ledger/motoko_ledger\.wasm["']\);"#,
    r#"[\s\S]*?\}"#
);

const WASM_PATHS_TEMPLATE: &str = r#"let ICRC_WASM_PATH = resolve(__dirname, "./icrc_ledger/ledger.wasm");
let MOTOKO_WASM_PATH = resolve(__dirname, "./icrc_ledger/motoko_ledger.wasm.gz");

if (LEDGER_IMPL === "motoko") {
    console.log("🚀🦀 USING MOTOKO LEDGER - BRACE FOR IMPACT! 💥🦑");
}"#;

// 4. get_motoko_args, inserted after the existing get_args function.
const MOTOKO_ARGS_PRECONDITION: &str =
    r#"(function get_args\(me:\s*Principal\)[\s\S]*?return ledger_args;\s*\})"#;

const MOTOKO_ARGS_TEMPLATE: &str = r#"${1}

// Init args for Motoko ICRC_fungible token (PanIndustrial)
function get_motoko_args(me: Principal): any {
    // Note: outer [[{...}]] because init arg is opt(record)
    // [value] = Some, [] = None for opt types
    const initArgs: any = [[{
        icrc1: [{
            fee: [{ Fixed: 10000n }],
            advanced_settings: [] as never[],
            max_memo: [80n],
            decimals: 8,
            metadata: [] as never[],
            minting_account: [{ owner: me, subaccount: [] as never[] }],
            logo: [] as never[],
            permitted_drift: [] as never[],
            name: ["Test Coin"],
            settle_to_accounts: [] as never[],
            fee_collector: [] as never[],
            transaction_window: [] as never[],
            min_burn_amount: [] as never[],
            max_supply: [] as never[],
            max_accounts: [] as never[],
            symbol: ["tCOIN"],
        }],
        icrc2: [{
            fee: [{ ICRC1: null as null }],
            advanced_settings: [] as never[],
            max_allowance: [{ TotalSupply: null as null }],
            max_approvals: [10_000_000n],
            max_approvals_per_account: [10_000n],
            settle_to_approvals: [9_990_000n],
        }],
        icrc3: {
            maxRecordsToArchive: 3000n,
            archiveIndexType: { Stable: null as null },
            maxArchivePages: 62500n,
            settleToRecords: 2000n,
            archiveCycles: 2_000_000_000_000n,
            maxActiveRecords: 4000n,
            maxRecordsInArchiveInstance: 10_000_000n,
            archiveControllers: [] as never[],
            supportedBlocks: [
                { block_type: "1burn", url: "https://github.com/dfinity/ICRC-1/tree/main/standards/ICRC-3" },
                { block_type: "1mint", url: "https://github.com/dfinity/ICRC-1/tree/main/standards/ICRC-3" },
                { block_type: "2approve", url: "https://github.com/dfinity/ICRC-1/tree/main/standards/ICRC-3" },
                { block_type: "1xfer", url: "https://github.com/dfinity/ICRC-1/tree/main/standards/ICRC-3" },
                { block_type: "2xfer", url: "https://github.com/dfinity/ICRC-1/tree/main/standards/ICRC-3" },
            ],
        },
        icrc4: [{
            fee: [{ ICRC1: null as null }],
            max_balances: [200n],
            max_transfers: [200n],
        }],
    }]];
    return initArgs;
}"#;

// 5. Branching ICRCLedger constructor. The precondition bounds the entire
//    original function, from the exported declaration to its closing `};`.
const CONSTRUCTOR_PRECONDITION: &str = concat!(
    r#"export async function ICRCLedger\(pic:\s*PocketIc,\s*me:\s*Principal,\s*subnet:\s*Principal\s*\|\s*undefined\)\s*\{"#,
    r#"[\s\S]*?const fixture = await pic\.setupCanister<ICRCLedgerService>\(\{"#,
    r#"[\s\S]*?idlFactory:\s*ICRCLedgerIdlFactory,"#,
    r#"[\s\S]*?wasm:\s*ICRC_WASM_PATH,"#,
    r#"[\s\S]*?arg:\s*IDL\.encode\(icrcInit\(\{IDL\}\),\s*\[get_args\(me\)\]\),"#,
    r#"[\s\S]*?\}\);"#,
    r#"[\s\S]*?await pic\.addCycles"#,
    r#"[\s\S]*?return \{"#,
    r#"[\s\S]*?canisterId:.*?fixture\.canisterId,"#,
    r#"[\s\S]*?actor:.*?fixture\.actor.*?ICRCLedgerService>"#,
    r#"[\s\S]*?\};"#,
    r#"[\s\S]*?\};"#
);

const CONSTRUCTOR_TEMPLATE: &str = r#"export async function ICRCLedger(pic: PocketIc, me:Principal, subnet:Principal | undefined) {
    // Use Motoko ICRC_fungible ledger with its own init format
    if (LEDGER_IMPL === "motoko") {
        const fixture = await pic.setupCanister<ICRCLedgerService>({
            //@ts-ignore - MotokoLedgerIdlFactory has compatible interface
            idlFactory: MotokoLedgerIdlFactory,
            wasm: MOTOKO_WASM_PATH,
            arg: IDL.encode(motokoInit({ IDL }), get_motoko_args(me)),
            ...subnet ? { targetSubnetId: subnet } : {},
        });
        await pic.addCycles(fixture.canisterId, 100_000_000_000_000_000);

        // Return with DFINITY-compatible IDL factory for middleware compatibility
        const proxyActor = pic.createActor<ICRCLedgerService>(ICRCLedgerIdlFactory, fixture.canisterId);
        return {
            canisterId: fixture.canisterId,
            actor: proxyActor
        };
    }

    // Default: Use DFINITY ICRC ledger
    const fixture = await pic.setupCanister<ICRCLedgerService>({
        idlFactory: ICRCLedgerIdlFactory,
        wasm: ICRC_WASM_PATH,
        arg: IDL.encode(icrcInit({IDL}), [get_args(me)]),
        ...subnet?{targetSubnetId: subnet}:{},
    });

    await pic.addCycles(fixture.canisterId, 100_000_000_000_000_000);

    return {
        canisterId: fixture.canisterId,
        actor: fixture.actor as Actor<ICRCLedgerService>
    };
};"#;

// 6. Branching ICRCLedgerUpgrade, each branch with its own WASM path and
//    argument encoding.
const UPGRADE_PRECONDITION: &str = concat!(
    r#"export async function ICRCLedgerUpgrade\(pic:\s*PocketIc,\s*me:\s*Principal,\s*canister_id:\s*Principal,\s*subnet:\s*Principal\s*\|\s*undefined\)\s*\{"#,
    r#"[\s\S]*?await pic\.upgradeCanister\(\{"#,
    r#"[\s\S]*?canisterId:\s*canister_id,"#,
    r#"[\s\S]*?wasm:\s*ICRC_WASM_PATH,"#,
    r#"[\s\S]*?\}\);"#,
    r#"[\s\S]*?\}"#
);

const UPGRADE_TEMPLATE: &str = r#"export async function ICRCLedgerUpgrade(pic: PocketIc, me:Principal, canister_id:Principal, subnet:Principal | undefined) {
    if (LEDGER_IMPL === "motoko") {
        // Motoko ledger upgrade with null args to keep existing state
        await pic.upgradeCanister({
            canisterId: canister_id,
            wasm: MOTOKO_WASM_PATH,
            arg: IDL.encode(motokoInit({ IDL }), [[]])
        });
    } else {
        // DFINITY ledger upgrade
        await pic.upgradeCanister({ canisterId: canister_id, wasm: ICRC_WASM_PATH, arg: IDL.encode(icrcInit({ IDL }), [{Upgrade: []}]) });
    }
}"#;

/// Build the six-patch set, in application order.
///
/// Guards for patches 5 and 6 use markers unique to their own replacement
/// bodies rather than the bare selector literal: the selector also appears in
/// patch 3's status print, which would otherwise satisfy the guard before the
/// function rewrites ever ran.
pub fn motoko_support_patches() -> Result<Vec<Patch>, PatternError> {
    Ok(vec![
        Patch::new(
            "motoko-import",
            IMPORT_PRECONDITION,
            Guard::substring("MotokoLedgerIdlFactory"),
            IMPORT_TEMPLATE,
        )?,
        Patch::new(
            "ledger-impl-export",
            SELECTOR_PRECONDITION,
            Guard::substring("LEDGER_IMPL"),
            SELECTOR_TEMPLATE,
        )?,
        Patch::new(
            "wasm-paths",
            WASM_PATHS_PRECONDITION,
            Guard::substring("MOTOKO_WASM_PATH"),
            WASM_PATHS_TEMPLATE,
        )?,
        Patch::new(
            "motoko-init-args",
            MOTOKO_ARGS_PRECONDITION,
            Guard::substring("get_motoko_args"),
            MOTOKO_ARGS_TEMPLATE,
        )?,
        Patch::new(
            "ledger-constructor",
            CONSTRUCTOR_PRECONDITION,
            Guard::substring("createActor<ICRCLedgerService>"),
            CONSTRUCTOR_TEMPLATE,
        )?,
        Patch::new(
            "ledger-upgrade",
            UPGRADE_PRECONDITION,
            Guard::substring("motokoInit({ IDL }), [[]]"),
            UPGRADE_TEMPLATE,
        )?,
    ])
}
