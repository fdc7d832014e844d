//! Archives must be readable by, and extract archives written by, an
//! independent ZIP implementation.

use std::fs::{self, File};
use std::io::{Read, Write};

use tempfile::tempdir;
use zip::CompressionMethod;
use zip::write::FileOptions;

#[test]
fn test_independent_reader_accepts_our_archives() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("root");
    fs::create_dir_all(root.join("sub")).unwrap();
    fs::create_dir_all(root.join("empty")).unwrap();
    fs::write(root.join("a.txt"), b"hello").unwrap();
    fs::write(root.join("sub").join("b.txt"), "world ".repeat(500)).unwrap();
    let archive_path = tmp.path().join("archive.zip");

    zipdir::compress(&root, &archive_path, true).unwrap();

    let mut archive = zip::ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
    assert_eq!(archive.len(), 5);

    let mut names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec!["root/", "root/a.txt", "root/empty/", "root/sub/", "root/sub/b.txt"]
    );

    assert!(archive.by_name("root/empty/").unwrap().is_dir());

    let mut contents = String::new();
    archive
        .by_name("root/sub/b.txt")
        .unwrap()
        .read_to_string(&mut contents)
        .unwrap();
    assert_eq!(contents, "world ".repeat(500));
}

#[test]
fn test_we_extract_independent_archives() {
    let tmp = tempdir().unwrap();
    let archive_path = tmp.path().join("foreign.zip");

    {
        let mut writer = zip::ZipWriter::new(File::create(&archive_path).unwrap());
        let deflated = FileOptions::default().compression_method(CompressionMethod::Deflated);
        let stored = FileOptions::default().compression_method(CompressionMethod::Stored);

        writer.add_directory("docs/", stored).unwrap();
        writer.start_file("docs/readme.md", deflated).unwrap();
        writer.write_all(&b"# readme\n".repeat(200)).unwrap();
        writer.start_file("raw.bin", stored).unwrap();
        writer.write_all(&[0u8, 1, 2, 3, 255]).unwrap();
        writer.add_directory("nothing/", stored).unwrap();
        writer.finish().unwrap();
    }

    let out = tmp.path().join("out");
    zipdir::extract(&archive_path, &out).unwrap();

    assert_eq!(
        fs::read(out.join("docs").join("readme.md")).unwrap(),
        b"# readme\n".repeat(200)
    );
    assert_eq!(fs::read(out.join("raw.bin")).unwrap(), vec![0u8, 1, 2, 3, 255]);
    assert!(out.join("nothing").is_dir());
}
