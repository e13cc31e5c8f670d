use tonic_build::manual::{Builder, Method, Service};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Message types are written by hand in `src/ping.rs` with `prost` derives,
    // so only the service stubs are generated here and no `protoc` is needed.
    let ping = Service::builder()
        .name("PingService")
        .package("infrastructure.v1")
        .method(
            Method::builder()
                .name("ping")
                .route_name("Ping")
                .input_type("crate::ping::PingRequest")
                .output_type("crate::ping::PingResponse")
                .codec_path("tonic::codec::ProstCodec")
                .build(),
        )
        .build();

    Builder::new().compile(&[ping]);

    println!("cargo:rerun-if-changed=build.rs");

    Ok(())
}
