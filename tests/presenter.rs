mod common;

use quickcomic::{
    prepare, presenter::PresenterOptions, CellImage, GridDataSource, GridDelegate,
};

use self::common::{cbz, png, TIMEOUT};

#[test]
fn grid_shows_every_page_of_an_archive() {
    let (_dir, path) = cbz(&[
        ("page10.png", png(10, 10)),
        ("page2.png", png(2, 2)),
        ("page1.png", png(1, 1)),
    ]);

    let session = prepare(&path).unwrap();
    let mut grid = session.presenter(PresenterOptions::default());

    // ZIP archives cannot be read concurrently
    assert!(grid.is_serial());
    assert_eq!(grid.cell_count(), session.catalog().len());

    let cells = (0..grid.cell_count())
        .map(|position| {
            let cell = grid.make_cell();
            grid.bind_cell(cell, position);
            grid.on_will_display(cell);
            cell
        })
        .collect::<Vec<_>>();

    assert!(grid.settle(TIMEOUT));

    let widths = cells
        .iter()
        .map(|&cell| grid.cell_image(cell).and_then(CellImage::page).map(|p| p.width))
        .collect::<Vec<_>>();

    assert_eq!(widths, [Some(1), Some(2), Some(10)]);
}

#[test]
fn corrupt_pages_only_affect_their_cell() {
    let (_dir, path) = cbz(&[
        ("1.png", png(1, 1)),
        ("2.png", b"garbage".to_vec()),
        ("3.png", png(3, 3)),
    ]);

    let session = prepare(&path).unwrap();
    let mut grid = session.presenter(PresenterOptions::default());

    let cells = (0..3)
        .map(|position| {
            let cell = grid.make_cell();
            grid.bind(cell, position);
            grid.will_display(cell);
            cell
        })
        .collect::<Vec<_>>();

    assert!(grid.settle(TIMEOUT));

    assert_eq!(grid.cell_image(cells[0]).unwrap().page().unwrap().width, 1);
    assert!(grid.cell_image(cells[1]).unwrap().is_placeholder());
    assert_eq!(grid.cell_image(cells[2]).unwrap().page().unwrap().width, 3);
}

#[test]
fn recycled_cells_end_up_on_their_last_page() {
    let (_dir, path) = cbz(&[("a.png", png(5, 5)), ("b.png", png(7, 7))]);

    let session = prepare(&path).unwrap();
    let mut grid = session.presenter(PresenterOptions {
        thumbnail_edge: Some(6),
        force_serial: false,
    });

    let cell = grid.make_cell();
    grid.bind(cell, 0);
    grid.will_display(cell);
    grid.bind(cell, 1);
    grid.will_display(cell);

    assert!(grid.settle(TIMEOUT));

    let binding = grid.cell_binding(cell).unwrap();
    assert_eq!(binding.position, 1);
    assert_eq!(grid.cell_image(cell).unwrap().page().unwrap().width, 6);
}

#[test]
fn dropping_the_session_stops_new_loads() {
    let (_dir, path) = cbz(&[("a.png", png(5, 5))]);

    let session = prepare(&path).unwrap();
    let mut grid = session.presenter(PresenterOptions::default());
    let cell = grid.make_cell();
    grid.bind(cell, 0);

    drop(session);
    grid.will_display(cell);

    assert_eq!(grid.in_flight(), 0);
    assert!(matches!(grid.cell_image(cell), Some(CellImage::Empty)));
}
