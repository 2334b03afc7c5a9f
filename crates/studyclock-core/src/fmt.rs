//! Duration display helpers shared by presentation layers.

/// Format seconds as `mm:ss` for a phase countdown.
pub fn format_mmss(sec: u32) -> String {
    format!("{:02}:{:02}", sec / 60, sec % 60)
}

/// Format seconds as `h:mm` for cumulative totals.
pub fn format_hm(sec: u64) -> String {
    format!("{}:{:02}", sec / 3600, (sec % 3600) / 60)
}
