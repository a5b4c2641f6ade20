//! Application layer use cases for the touch bridge.
//!
//! # What use cases does the bridge have?
//!
//! - **`inject_touch`** – The refresh pipeline.  On every protocol refresh it
//!   snapshots the cursor table, builds one touch batch, submits it through a
//!   `TouchInjector` injected at construction time, and prunes released
//!   cursors once the host accepted the batch.
//!
//! - **`select_display`** – Picks the display whose bounds the normalized
//!   cursor coordinates are stretched over.
//!
//! - **`startup`** – Brings up touch injection and the protocol channel in a
//!   fixed order, then arms the refresh loop.
//!
//! - **`settings`** / **`stats`** – The runtime-tunable contact radius and
//!   the pipeline counters shared with the UI bridge.

pub mod inject_touch;
pub mod select_display;
pub mod settings;
pub mod startup;
pub mod stats;
