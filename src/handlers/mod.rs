pub mod mount;
pub mod status;

pub use mount::{list_mount_files_handler, make_mount_file_handler};
pub use status::{elb_check_handler, root_handler};
