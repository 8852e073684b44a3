//! keyflow マニフェスト
//!
//! `keyflow.kdl` を探索・パースし、宣言されたリソースを
//! [`keyflow_resource::ResourceSet`] に変換します。

pub mod discovery;
pub mod error;
pub mod parser;

pub use discovery::{find_manifest, find_manifest_from};
pub use error::{ManifestError, Result};
pub use parser::{Manifest, parse_manifest_file, parse_manifest_string};
