pub mod alert;
pub mod client;
pub mod poller;
pub mod status;

pub use alert::{AlertSink, ChannelAlertSink, StderrAlertSink};
pub use client::{fetch_snapshot, ClientError, StatusApi, StatusClient, StatusSnapshot};
pub use poller::{spawn_poller, PollerHandle, StatusUpdate};
