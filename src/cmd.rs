use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[clap(about = "Preview the pages of a comic book archive")]
pub struct Args {
    #[clap(help = "Archive (CBZ, CB7) or folder of images to preview")]
    pub path: PathBuf,

    #[clap(long, help = "Maximum size of the thumbnails, in pixels")]
    pub thumbnail_size: Option<u32>,

    #[clap(long, help = "Read pages from a single background thread")]
    pub serial_reads: bool,
}
