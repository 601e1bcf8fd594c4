//! Command line of the notification gateway

use clap::{Args, Parser};
use std::path::PathBuf;

/// Liquidsoap notification gateway
///
/// Invoked by the engine once per playback or status change; relays the
/// event to the scheduling server and exits.
#[derive(Parser, Debug, Clone)]
#[command(name = "playout-notify")]
#[command(about = "Notification gateway between Liquidsoap and the scheduling server")]
#[command(version)]
#[command(args_override_self = true)]
pub struct Cli {
    #[command(flatten)]
    pub invocation: EventInvocation,

    /// Configuration file (default: $PLAYOUT_CONFIG_PATH or /etc/airtime/airtime.yml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Verbose logging with source locations
    #[arg(long)]
    pub debug: bool,
}

/// Fields supplied by one engine callback.
///
/// Any combination parses; which event it means is decided afterwards by
/// [`classify`](crate::classify).
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct EventInvocation {
    /// JSON data from Liquidsoap
    #[arg(short = 'd', long, value_name = "DATA")]
    pub data: Option<String>,

    /// ID of the file that is currently playing
    #[arg(short = 'm', long, value_name = "MEDIA_ID")]
    pub media_id: Option<String>,

    /// Liquidsoap error message
    #[arg(short = 'e', long, value_name = "ERROR_MSG", allow_hyphen_values = true)]
    pub error: Option<String>,

    /// Output stream ID
    #[arg(short = 's', long, value_name = "STREAM_ID")]
    pub stream_id: Option<String>,

    /// Liquidsoap connected
    #[arg(short = 'c', long)]
    pub connect: bool,

    /// Liquidsoap boot up time
    #[arg(short = 't', long, value_name = "TIME")]
    pub time: Option<String>,

    /// Source connection name
    #[arg(short = 'x', long, value_name = "SOURCE_NAME")]
    pub source_name: Option<String>,

    /// Source connection status
    #[arg(short = 'y', long, value_name = "SOURCE_STATUS")]
    pub source_status: Option<String>,

    /// JSON metadata associated with a webstream
    #[arg(short = 'w', long, value_name = "JSON_DATA")]
    pub webstream: Option<String>,

    /// Notify that Liquidsoap started
    #[arg(short = 'n', long)]
    pub liquidsoap_started: bool,
}
