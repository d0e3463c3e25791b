//! Client for the detection service.
//!
//! Each call raises both the encode and decode limits to the limit of its own
//! operation, so large blueprints go through while `Predict` stays capped.
//! Oversized requests are refused locally with `RESOURCE_EXHAUSTED` before
//! anything is sent.

use crate::service::config::MessageLimits;
use crate::service::grpc::{check_size, status_from_error};
use crate::service::proto::symbol_detector_client::SymbolDetectorClient;
use crate::service::proto::{PredictRequest, PredictResponse, ScanRequest, ScanResponse};
use crate::util::{SymScanError, SymScanResult};
use prost::Message;
use std::time::Duration;
use tonic::transport::{Channel, Endpoint};
use tonic::{Code, Request, Status, TimeoutExpired};

/// Connection to a `SymbolDetector` server.
#[derive(Clone, Debug)]
pub struct DetectorClient {
    channel: Channel,
    limits: MessageLimits,
    timeout: Option<Duration>,
}

impl DetectorClient {
    /// Connects to `addr` (`host:port`, with or without an `http://` prefix).
    pub async fn connect(addr: &str, limits: MessageLimits) -> SymScanResult<Self> {
        let uri = if addr.contains("://") {
            addr.to_string()
        } else {
            format!("http://{addr}")
        };
        let endpoint = Endpoint::from_shared(uri)
            .map_err(|err| SymScanError::validation(format!("invalid address {addr}: {err}")))?;
        let channel = endpoint
            .connect()
            .await
            .map_err(|err| SymScanError::Internal(format!("cannot connect to {addr}: {err}")))?;
        Ok(Self::with_channel(channel, limits))
    }

    /// Wraps an existing channel.
    pub fn with_channel(channel: Channel, limits: MessageLimits) -> Self {
        Self {
            channel,
            limits,
            timeout: None,
        }
    }

    /// Sends a `grpc-timeout` deadline with every call.
    ///
    /// The server abandons the response once it passes; an oracle call
    /// already running is not interrupted.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn stub(&self, limit: usize) -> SymbolDetectorClient<Channel> {
        SymbolDetectorClient::new(self.channel.clone())
            .max_encoding_message_size(limit)
            .max_decoding_message_size(limit)
    }

    fn prepare<T: Message>(
        &self,
        operation: &'static str,
        message: T,
        limit: usize,
    ) -> Result<Request<T>, Status> {
        check_size(operation, message.encoded_len(), limit)
            .map_err(|err| status_from_error(&err))?;
        let mut request = Request::new(message);
        if let Some(timeout) = self.timeout {
            request.set_timeout(timeout);
        }
        Ok(request)
    }

    /// Reports an expired `grpc-timeout` as `DEADLINE_EXCEEDED`; tonic's
    /// timeout layers surface it as `CANCELLED` on either side of the wire.
    fn deadline_status(&self, operation: &'static str, status: Status) -> Status {
        match self.timeout {
            Some(timeout)
                if status.code() == Code::Cancelled
                    && status.message() == TimeoutExpired(()).to_string() =>
            {
                status_from_error(&SymScanError::DeadlineExceeded {
                    operation,
                    timeout_ms: timeout.as_millis() as u64,
                })
            }
            _ => status,
        }
    }

    /// Compares two encoded images.
    pub async fn predict(
        &self,
        reference_image: Vec<u8>,
        query_image: Vec<u8>,
    ) -> Result<PredictResponse, Status> {
        let limit = self.limits.predict_max_message_bytes;
        let request = self.prepare(
            "Predict",
            PredictRequest {
                reference_image,
                query_image,
            },
            limit,
        )?;
        let response = self
            .stub(limit)
            .predict(request)
            .await
            .map_err(|status| self.deadline_status("Predict", status))?;
        Ok(response.into_inner())
    }

    /// Scans an encoded blueprint for the encoded reference symbol.
    pub async fn scan_blueprint(
        &self,
        reference_image: Vec<u8>,
        blueprint_image: Vec<u8>,
    ) -> Result<ScanResponse, Status> {
        let limit = self.limits.scan_max_message_bytes;
        let request = self.prepare(
            "ScanBlueprint",
            ScanRequest {
                reference_image,
                blueprint_image,
            },
            limit,
        )?;
        let response = self
            .stub(limit)
            .scan_blueprint(request)
            .await
            .map_err(|status| self.deadline_status("ScanBlueprint", status))?;
        Ok(response.into_inner())
    }
}
