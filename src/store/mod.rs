//! Local persistence for recorded sessions and their CSV exports.

pub mod csv;
pub mod sessions;

pub use csv::{
    export_live_buffer, live_export_filename, parse_csv, samples_to_csv, session_export_filename,
    write_export, CsvRow, ExportError, CSV_HEADER, CSV_MIME,
};
pub use sessions::{SessionStore, StoreError, SESSIONS_FILE};
