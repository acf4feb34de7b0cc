pub mod cache;
pub mod error;
pub mod report;
pub mod service;
pub mod topic;
pub mod tree;

pub use cache::TreeCache;
pub use error::{CacheError, CoreError};
pub use service::{TreeResponse, TreeService};
pub use topic::Topic;

pub fn print_banner() {
    println!(
        r#"
          _ _    _ _
__      _(_) | _(_) |_ _ __ ___  ___
\ \ /\ / / | |/ / | __| '__/ _ \/ _ \
 \ V  V /| |   <| | |_| | |  __/  __/
  \_/\_/ |_|_|\_\_|\__|_|  \___|\___|
        see-also topic trees  v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
