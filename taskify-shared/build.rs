//! Compiles the protobuf definitions under `proto/` into tonic clients and
//! servers. Generated code lands in `OUT_DIR` and is pulled in by
//! `src/proto.rs` through `tonic::include_proto!`.
//!
//! `protoc` comes from `protoc-bin-vendored`, so no system install is needed.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let protoc = protoc_bin_vendored::protoc_bin_path()
        .map_err(|e| format!("vendored protoc unavailable: {e:?}"))?;
    std::env::set_var("PROTOC", protoc);

    for proto in ["proto/users.proto", "proto/boards.proto"] {
        tonic_build::compile_protos(proto)?;
        println!("cargo:rerun-if-changed={proto}");
    }

    Ok(())
}
