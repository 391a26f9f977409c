//! `fetch-metadata`: Collects compliance metadata for recently created repositories.

use clap::Parser;
use tracing::{info_span, Instrument};

use cli::{fetch_metadata, init_tracing, normalize_legacy_flags, FetchMetadataArgs};
use policy::RunId;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = FetchMetadataArgs::parse_from(normalize_legacy_flags(std::env::args_os()));
    init_tracing(args.common.log_format);

    let run_id = RunId::new_random();
    let span = info_span!("fetch_metadata", run_id = %run_id);
    fetch_metadata(&args).instrument(span).await
}
