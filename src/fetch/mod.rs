use crate::error::Result;

pub mod cancel;
pub mod decode;
pub mod intraday;
pub mod request;
pub mod transport;

pub use cancel::{cancel_pair, CancelHandle, CancelSignal};
pub use decode::{parse_intraday, StockPoint, StockSeries};
pub use intraday::IntradayFetcher;
pub use request::{prepare_request, FetchRequest, Interval, OutputSize, PreparedRequest};
pub use transport::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};

pub type FetchResult<T> = Result<T>;
