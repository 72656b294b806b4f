// Windowed extraction layer
//
// Turns a time range into a bounded sequence of page-limited search
// requests. Network and response faults are absorbed per increment and
// reported as tagged outcomes; they never abort a fetch.

pub mod error;
pub mod fetcher;
pub mod page;
pub mod query;
pub mod transport;

pub use error::{Error, Result};
pub use fetcher::{
    FetchReport, FetchSettings, IncrementOutcome, IncrementReport, QueryWindow, SkipReason,
    WindowPolicy, WindowedFetcher, Windows, plan_windows,
};
pub use page::PageResult;
pub use transport::{ConnectionConfig, HttpReply, HttpTransport, SearchTransport, TransportError};
