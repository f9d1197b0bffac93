use huffpack::{
    compress_file, decompress_file, CodecOptions, HuffError, Huffman, SingleSymbolPolicy,
};
use std::fs;
use std::io::ErrorKind;
use tempfile::TempDir;

fn sample_text() -> Vec<u8> {
    "the quick brown fox jumps over the lazy dog\n"
        .repeat(200)
        .into_bytes()
}

#[test]
fn test_file_roundtrip() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("input.txt");
    let packed = dir.path().join("input.txt.huff");
    let restored = dir.path().join("input.txt.out");
    fs::write(&src, sample_text()).unwrap();

    let options = CodecOptions::default();
    let stats = compress_file(&src, &packed, &options).unwrap();
    assert_eq!(stats.input_len, sample_text().len() as u64);
    assert_eq!(stats.output_len, fs::metadata(&packed).unwrap().len());
    assert!(stats.compression_ratio() < 100.0);

    let back = decompress_file(&packed, &restored, &options).unwrap();
    assert_eq!(back.output_len, stats.input_len);
    assert_eq!(fs::read(&restored).unwrap(), sample_text());
}

#[test]
fn test_empty_file() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("empty");
    let packed = dir.path().join("empty.huff");
    let restored = dir.path().join("empty.out");
    fs::write(&src, b"").unwrap();

    let codec = Huffman::new();
    codec.compress_file(&src, &packed).unwrap();
    assert_eq!(fs::read(&packed).unwrap(), vec![0x41, 0x42, 0x00, 0x00]);

    codec.decompress_file(&packed, &restored).unwrap();
    assert!(fs::read(&restored).unwrap().is_empty());
}

#[test]
fn test_missing_source() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("does-not-exist");
    let dst = dir.path().join("out.huff");

    let err = compress_file(&src, &dst, &CodecOptions::default()).unwrap_err();
    assert!(matches!(err, HuffError::SourceUnreadable(_)));
    assert!(!dst.exists());
}

#[test]
fn test_unwritable_destination() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("input");
    fs::write(&src, b"abc").unwrap();
    let dst = dir.path().join("missing-dir").join("out.huff");

    let err = compress_file(&src, &dst, &CodecOptions::default()).unwrap_err();
    assert!(matches!(err, HuffError::SinkUnwritable(_)));
}

#[test]
fn test_corrupt_container_leaves_no_output() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("broken.huff");
    let dst = dir.path().join("broken.out");
    // Tree section claims 9 bytes but the file ends after 2.
    fs::write(&src, [b'A', b'B', 0x00, 0x09, b'*', b'a']).unwrap();

    let err = decompress_file(&src, &dst, &CodecOptions::default()).unwrap_err();
    assert!(matches!(err, HuffError::CorruptTree(_)));
    assert!(!dst.exists());
}

#[test]
fn test_rejected_input_leaves_no_output() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("zeros");
    let dst = dir.path().join("zeros.huff");
    fs::write(&src, [0u8; 64]).unwrap();

    let options = CodecOptions::new().single_symbol(SingleSymbolPolicy::Reject);
    let err = compress_file(&src, &dst, &options).unwrap_err();
    assert!(matches!(err, HuffError::DegenerateAlphabet(0)));
    assert!(!dst.exists());
}

#[test]
fn test_truncated_file() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("short.huff");
    let dst = dir.path().join("short.out");
    fs::write(&src, b"AB").unwrap();

    let err = decompress_file(&src, &dst, &CodecOptions::default()).unwrap_err();
    assert!(matches!(err, HuffError::Truncated));
    assert!(!dst.exists());
}

#[test]
fn test_same_source_and_destination_refused() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("input.txt");
    fs::write(&src, sample_text()).unwrap();
    let alias = dir.path().join(".").join("input.txt");

    let err = compress_file(&src, &alias, &CodecOptions::default()).unwrap_err();
    match err {
        HuffError::SinkUnwritable(e) => assert_eq!(e.kind(), ErrorKind::InvalidInput),
        other => panic!("expected SinkUnwritable, got {other:?}"),
    }
    assert_eq!(fs::read(&src).unwrap(), sample_text());

    let err = decompress_file(&src, &src, &CodecOptions::default()).unwrap_err();
    assert!(matches!(err, HuffError::SinkUnwritable(_)));
    assert_eq!(fs::read(&src).unwrap(), sample_text());
}
