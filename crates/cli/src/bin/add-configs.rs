//! `add-configs`: Commits missing Gitleaks configuration to production repositories.

use clap::Parser;
use tracing::{info_span, Instrument};

use cli::{add_configs, init_tracing, normalize_legacy_flags, AddConfigsArgs};
use policy::RunId;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = AddConfigsArgs::parse_from(normalize_legacy_flags(std::env::args_os()));
    init_tracing(args.common.log_format);

    let run_id = RunId::new_random();
    let span = info_span!("add_configs", run_id = %run_id);
    add_configs(&args).instrument(span).await
}
