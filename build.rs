//! Generates the `SymbolDetector` gRPC client and server stubs.
//!
//! Messages are declared by hand in `src/service/proto.rs` with prost
//! derives, so no `protoc` is needed at build time.

fn main() {
    let predict = tonic_build::manual::Method::builder()
        .name("predict")
        .route_name("Predict")
        .input_type("crate::service::proto::PredictRequest")
        .output_type("crate::service::proto::PredictResponse")
        .codec_path("tonic::codec::ProstCodec")
        .build();

    let scan_blueprint = tonic_build::manual::Method::builder()
        .name("scan_blueprint")
        .route_name("ScanBlueprint")
        .input_type("crate::service::proto::ScanRequest")
        .output_type("crate::service::proto::ScanResponse")
        .codec_path("tonic::codec::ProstCodec")
        .build();

    let service = tonic_build::manual::Service::builder()
        .name("SymbolDetector")
        .package("symbol_detector")
        .method(predict)
        .method(scan_blueprint)
        .build();

    tonic_build::manual::Builder::new().compile(&[service]);
    println!("cargo:rerun-if-changed=build.rs");
}
