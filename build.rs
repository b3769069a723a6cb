//! Build script for proto compilation.
//!
//! Compiles `proto/provider.proto` into the `generated` module using the
//! vendored `protoc` binary, so no system protobuf install is needed.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=proto/provider.proto");

    let protoc = protoc_bin_vendored::protoc_bin_path()?;
    std::env::set_var("PROTOC", protoc);

    tonic_prost_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&["proto/provider.proto"], &["proto"])?;

    Ok(())
}
