//! `apply-branch-protection`: Applies the standard branch protection to unprotected production repositories.

use clap::Parser;
use tracing::{info_span, Instrument};

use cli::{
    apply_branch_protection, init_tracing, normalize_legacy_flags, ApplyBranchProtectionArgs,
};
use policy::RunId;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args =
        ApplyBranchProtectionArgs::parse_from(normalize_legacy_flags(std::env::args_os()));
    init_tracing(args.common.log_format);

    let run_id = RunId::new_random();
    let span = info_span!("apply_branch_protection", run_id = %run_id);
    apply_branch_protection(&args).instrument(span).await
}
