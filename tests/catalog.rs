mod common;

use std::fs;

use quickcomic::{
    archive::open_archive, first_page_size, prepare, Catalog, CorruptCause, PageSize,
    PreviewError,
};

use self::common::{cb7, cbz, png};

fn names(catalog: &Catalog) -> Vec<&str> {
    catalog.entries().iter().map(|e| e.name.as_str()).collect()
}

#[test]
fn pages_are_filtered_and_naturally_sorted() {
    let (_dir, path) = cbz(&[
        ("page10.png", png(1, 1)),
        ("ComicInfo.xml", b"<ComicInfo/>".to_vec()),
        ("page2.PNG", png(1, 1)),
        ("extras/", vec![]),
        ("page1.jpg", png(1, 1)),
        ("__MACOSX/._page1.jpg", b"fork".to_vec()),
    ]);

    let handle = open_archive(&path).unwrap();
    let catalog = Catalog::build(&*handle).unwrap();

    assert_eq!(names(&catalog), ["page1.jpg", "page2.PNG", "page10.png"]);

    // Indexes are the archive's, not the sorted positions
    let indexes = catalog.entries().iter().map(|e| e.index).collect::<Vec<_>>();
    assert_eq!(indexes, [4, 2, 0]);
    assert!(catalog.entries().iter().all(|e| e.is_displayable()));
}

#[test]
fn building_twice_gives_the_same_catalog() {
    let (_dir, path) = cbz(&[
        ("b/2.png", png(1, 1)),
        ("a/10.png", png(1, 1)),
        ("a/9.png", png(1, 1)),
        ("A/9.png", png(1, 1)),
    ]);

    let handle = open_archive(&path).unwrap();
    let first = Catalog::build(&*handle).unwrap();
    let second = Catalog::build(&*handle).unwrap();

    assert_eq!(first, second);
    assert_eq!(names(&first), ["A/9.png", "a/9.png", "a/10.png", "b/2.png"]);
}

#[test]
fn archives_without_pages_cannot_be_previewed() {
    let (_dir, path) = cbz(&[("readme.txt", b"hi".to_vec()), ("scans/", vec![])]);

    let err = prepare(&path).err().unwrap();

    assert!(matches!(
        &err,
        PreviewError::CorruptArchive { path: failed, cause: CorruptCause::NoPages } if *failed == path
    ));
}

#[test]
fn empty_archives_cannot_be_previewed() {
    let (_dir, path) = cbz(&[]);

    let err = prepare(&path).err().unwrap();

    assert!(matches!(err.cause(), CorruptCause::Empty));
}

#[test]
fn unreadable_files_cannot_be_previewed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.cbz");
    fs::write(&path, b"PK\x03\x04 definitely truncated").unwrap();

    let err = prepare(&path).err().unwrap();

    assert!(matches!(err.cause(), CorruptCause::Open(_)));
    assert!(err.to_string().contains("broken.cbz"));
}

#[test]
fn first_page_size_comes_from_the_first_sorted_page() {
    let (_dir, path) = cbz(&[("2.png", png(30, 40)), ("1.png", png(640, 960))]);

    let session = prepare(&path).unwrap();

    assert_eq!(
        session.page_size(),
        PageSize {
            width: 640,
            height: 960
        }
    );
}

#[test]
fn first_page_size_falls_back_when_the_first_page_is_corrupt() {
    let (_dir, path) = cbz(&[("1.png", b"not a png".to_vec()), ("2.png", png(30, 40))]);

    let session = prepare(&path).unwrap();
    assert_eq!(session.page_size(), PageSize::FALLBACK);
    assert_eq!(
        (PageSize::FALLBACK.width, PageSize::FALLBACK.height),
        (800, 600)
    );

    let size = first_page_size(&**session.handle(), session.catalog());
    assert_eq!(size, PageSize::FALLBACK);
}

#[test]
fn folders_are_previewed_like_archives() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("10.png"), png(2, 2)).unwrap();
    fs::write(dir.path().join("9.png"), png(3, 3)).unwrap();
    fs::write(dir.path().join(".DS_Store"), b"junk").unwrap();

    let session = prepare(dir.path()).unwrap();

    assert_eq!(names(session.catalog()), ["9.png", "10.png"]);
    assert_eq!(session.page_size(), PageSize { width: 3, height: 3 });
}

#[test]
fn seven_zip_archives_are_previewed() {
    let (_dir, path) = cb7(&[
        ("page10.png", png(4, 6)),
        ("page2.png", png(8, 12)),
        ("ComicInfo.xml", b"<ComicInfo/>".to_vec()),
    ]);

    let session = prepare(&path).unwrap();

    assert_eq!(names(session.catalog()), ["page2.png", "page10.png"]);
    assert_eq!(
        session.page_size(),
        PageSize {
            width: 8,
            height: 12
        }
    );

    let handle = session.handle();
    let first = session.catalog().entries()[0].index;
    assert_eq!(handle.read_bytes(first).unwrap(), png(8, 12));
}
