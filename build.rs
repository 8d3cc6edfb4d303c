fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Fall back to the bundled protoc when the host does not provide one.
    if std::env::var_os("PROTOC").is_none() {
        let protoc = protoc_bin_vendored::protoc_bin_path()?;
        // SAFETY: build scripts run single-threaded.
        unsafe { std::env::set_var("PROTOC", protoc) };
    }

    println!("cargo:rerun-if-changed=proto/greeter.proto");

    tonic_prost_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&["proto/greeter.proto"], &["proto"])?;

    Ok(())
}
