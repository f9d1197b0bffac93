use huffpack::Huffman;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Compresses a file to `<file>.huff`, restores it to `<file>.out` and
/// verifies the result.
///
/// Usage: cargo run --example roundtrip <filename>
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <filename>", args[0]);
        std::process::exit(1);
    }

    let src = PathBuf::from(&args[1]);
    let packed = PathBuf::from(format!("{}.huff", args[1]));
    let restored = PathBuf::from(format!("{}.out", args[1]));

    let codec = Huffman::new();
    let stats = codec.compress_file(&src, &packed).unwrap_or_else(|e| {
        eprintln!("Compression of \"{}\" failed: {}", src.display(), e);
        std::process::exit(1);
    });
    let back = codec.decompress_file(&packed, &restored).unwrap_or_else(|e| {
        eprintln!("Decompression of \"{}\" failed: {}", packed.display(), e);
        std::process::exit(1);
    });

    let original = fs::read(&src).expect("Cannot reread input");
    let output = fs::read(&restored).expect("Cannot read restored file");
    if let Some(position) = original.iter().zip(&output).position(|(a, b)| a != b) {
        eprintln!(
            "Mismatch at position {}: file={}, restored={}",
            position, original[position], output[position]
        );
    } else if original.len() != output.len() {
        eprintln!(
            "Length mismatch: file={}, restored={}",
            original.len(),
            output.len()
        );
    }

    println!("\n=== Statistics ===");
    println!("Input bytes: {}", stats.input_len);
    println!("Container bytes: {}", stats.output_len);
    println!("Distinct symbols: {}", stats.distinct_symbols);
    println!("Tree size: {}", stats.tree_size);
    println!("Padding bits: {}", stats.garbage_bits);
    println!("Payload bits decoded: {}", back.payload_bits);
    println!("Compression ratio: {:.2}%", stats.compression_ratio());
}
