/// Utility modules for the frequency analyzer
///
/// This module contains corpus file handling and report rendering/export.

pub mod file_utils;
pub mod output_formatter;
