//! gRPC front end for the detector.
//!
//! Handlers check the per-operation size limit, run the detector on the worker
//! pool, and map failures to status codes. A failing request never takes the
//! server down.

use crate::service::config::{MessageLimits, ServiceConfig};
use crate::service::detector::Detector;
use crate::service::pool::WorkerPool;
use crate::service::proto::symbol_detector_server::{SymbolDetector, SymbolDetectorServer};
use crate::service::proto::{self, PredictRequest, PredictResponse, ScanRequest, ScanResponse};
use crate::trace::trace_log;
use crate::util::{SymScanError, SymScanResult};
use prost::Message;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tonic::{Request, Response, Status};

/// Maps a detection error to its gRPC status.
pub fn status_from_error(err: &SymScanError) -> Status {
    let message = err.to_string();
    match err {
        SymScanError::Validation { .. } => Status::invalid_argument(message),
        SymScanError::PayloadTooLarge { .. } => Status::resource_exhausted(message),
        SymScanError::DeadlineExceeded { .. } => Status::deadline_exceeded(message),
        SymScanError::Oracle { .. }
        | SymScanError::DimensionMismatch { .. }
        | SymScanError::Internal(_) => Status::internal(message),
    }
}

pub(crate) fn check_size(operation: &'static str, got: usize, limit: usize) -> SymScanResult<()> {
    if got > limit {
        return Err(SymScanError::PayloadTooLarge {
            operation,
            got,
            limit,
        });
    }
    Ok(())
}

/// `SymbolDetector` implementation backed by a [`Detector`].
#[derive(Clone, Debug)]
pub struct SymbolDetectorService {
    detector: Detector,
    pool: WorkerPool,
    limits: MessageLimits,
}

impl SymbolDetectorService {
    /// Creates a service with its own worker pool.
    pub fn new(detector: Detector, pool: WorkerPool, limits: MessageLimits) -> Self {
        Self {
            detector,
            pool,
            limits,
        }
    }

    /// Builds the detector, pool and limits from a service config.
    pub fn from_config(cfg: &ServiceConfig) -> SymScanResult<Self> {
        let detector = Detector::from_config(cfg)?;
        let pool =
            WorkerPool::new(cfg.workers).with_timeout(cfg.request_timeout_ms.map(Duration::from_millis));
        Ok(Self::new(detector, pool, cfg.limits))
    }

    /// Wraps the service in the generated server with transport size limits.
    pub fn into_server(self) -> SymbolDetectorServer<Self> {
        let max = self.limits.transport_max();
        SymbolDetectorServer::new(self)
            .max_decoding_message_size(max)
            .max_encoding_message_size(max)
    }

    async fn run_predict(&self, request: PredictRequest) -> SymScanResult<PredictResponse> {
        check_size(
            "Predict",
            request.encoded_len(),
            self.limits.predict_max_message_bytes,
        )?;
        trace_log!(
            info,
            "predict_request",
            reference_bytes = request.reference_image.len(),
            query_bytes = request.query_image.len()
        );

        let detector = self.detector.clone();
        let outcome = self
            .pool
            .run("Predict", move || {
                detector.predict(&request.reference_image, &request.query_image)
            })
            .await?;

        Ok(PredictResponse {
            similarity_score: outcome.score,
            is_match: outcome.is_match,
            message: format!("Score: {:.4}", outcome.score),
        })
    }

    async fn run_scan(&self, request: ScanRequest) -> SymScanResult<ScanResponse> {
        check_size(
            "ScanBlueprint",
            request.encoded_len(),
            self.limits.scan_max_message_bytes,
        )?;
        trace_log!(
            info,
            "scan_request",
            reference_bytes = request.reference_image.len(),
            blueprint_bytes = request.blueprint_image.len()
        );

        let detector = self.detector.clone();
        let report = self
            .pool
            .run("ScanBlueprint", move || {
                detector.scan_blueprint(&request.reference_image, &request.blueprint_image)
            })
            .await?;

        let matches: Vec<proto::BoundingBox> = report
            .matches
            .into_iter()
            .map(proto::BoundingBox::from)
            .collect();
        Ok(ScanResponse {
            message: format!("Scan complete. Found {} matches.", matches.len()),
            matches,
        })
    }
}

#[tonic::async_trait]
impl SymbolDetector for SymbolDetectorService {
    async fn predict(
        &self,
        request: Request<PredictRequest>,
    ) -> Result<Response<PredictResponse>, Status> {
        match self.run_predict(request.into_inner()).await {
            Ok(response) => Ok(Response::new(response)),
            Err(err) => {
                trace_log!(warn, "predict_failed", error = err.to_string().as_str());
                Err(status_from_error(&err))
            }
        }
    }

    async fn scan_blueprint(
        &self,
        request: Request<ScanRequest>,
    ) -> Result<Response<ScanResponse>, Status> {
        match self.run_scan(request.into_inner()).await {
            Ok(response) => Ok(Response::new(response)),
            Err(err) => {
                trace_log!(warn, "scan_failed", error = err.to_string().as_str());
                Err(status_from_error(&err))
            }
        }
    }
}

/// Resolves a `host:port` string to the first matching socket address.
pub async fn resolve_addr(addr: &str) -> SymScanResult<SocketAddr> {
    tokio::net::lookup_host(addr)
        .await
        .map_err(|err| SymScanError::validation(format!("cannot resolve {addr}: {err}")))?
        .next()
        .ok_or_else(|| SymScanError::validation(format!("{addr} resolved to no address")))
}

/// Serves the detector on `cfg.addr` until `signal` completes.
pub async fn serve_with_shutdown<F>(cfg: &ServiceConfig, signal: F) -> SymScanResult<()>
where
    F: Future<Output = ()> + Send,
{
    let service = SymbolDetectorService::from_config(cfg)?;
    let addr = resolve_addr(&cfg.addr).await?;
    trace_log!(
        info,
        "server_start",
        addr = addr.to_string().as_str(),
        workers = cfg.workers
    );

    tonic::transport::Server::builder()
        .add_service(service.into_server())
        .serve_with_shutdown(addr, signal)
        .await
        .map_err(|err| SymScanError::Internal(format!("transport failed: {err}")))
}

/// Serves the detector on `cfg.addr` until the process is stopped.
pub async fn serve(cfg: &ServiceConfig) -> SymScanResult<()> {
    serve_with_shutdown(cfg, std::future::pending()).await
}
