fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=proto/duckov_cards.proto");

    #[cfg(feature = "grpc")]
    tonic_build::compile_protos("proto/duckov_cards.proto")?;

    Ok(())
}
