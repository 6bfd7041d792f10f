pub mod credentials;
pub mod settings;
pub mod work_item;

pub use credentials::*;
pub use settings::*;
pub use work_item::*;
