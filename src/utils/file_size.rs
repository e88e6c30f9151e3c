pub struct FileSizeUtils;

impl FileSizeUtils {
    /// Decimal units: below one megabyte in KB, otherwise in MB, two decimals.
    pub fn format_size(size: u64) -> String {
        const KB: f64 = 1000.0;
        const MB: f64 = 1000.0 * 1000.0;

        let size = size as f64;
        if size < MB {
            format!("{:.2}KB", size / KB)
        } else {
            format!("{:.2}MB", size / MB)
        }
    }

    pub fn selection_summary(count: usize, total_bytes: u64) -> String {
        format!(
            "Selected {}, total size {}",
            count,
            Self::format_size(total_bytes)
        )
    }
}
