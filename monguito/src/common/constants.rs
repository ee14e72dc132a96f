// doc constants
pub const DOC_ID: &str = "_id";
/// Literal `_id` value asking [crate::collection::Collection::insert] for a fresh UUID.
pub const UUID_SENTINEL: &str = "uuid";

// key constants
pub const KEY_SEPARATOR: &str = "-";

// storage validation constants
pub const STORAGE_PROBE_KEY: &str = "1E7B9A3B-9D53-469F-BF4E-D056A3BE403C";
pub const STORAGE_PROBE_VALUE: &str = "3220B380-2E7A-49BD-9A51-44D6408ED989";

// index constants
pub const INITIAL_IDENTITY: u64 = 1;

// render constants
pub const RENDER_INDENT: &[u8] = b"\t";
