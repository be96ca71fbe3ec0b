//! On-disk configuration formats the game and its launcher share:
//! `.mod` descriptor files and `dlc_load.json`.

pub mod descriptor;
pub mod dlc_load;

pub use descriptor::ModDescriptor;
pub use dlc_load::DlcLoad;
