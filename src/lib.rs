#![warn(missing_docs)]
//! Библиотека клиента Tinkoff OpenAPI: декодирование ответов, агрегация
//! сделок и построение отчётов по сделкам и прибылям/убыткам.

mod aggregate;
mod client;
mod decode;
mod error;
mod report;
mod router;
mod types;
mod utils;

pub use crate::aggregate::TradesAggregator;
pub use crate::client::{ApiConfig, DEFAULT_HOST, InvestApiClient, OperationsRequest};
pub use crate::decode::{
    Decoded, Diagnostic, decode_instruments, decode_operations, decode_portfolio,
};
pub use crate::error::ApiError;
pub use crate::report::{ReportConfig, ReportWriter};
pub use crate::router::{ResponseHandler, ResponseKind, ResponseRouter};
pub use crate::types::*;
