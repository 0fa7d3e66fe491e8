use anyhow::Result;
use fs_err::File;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use serde::Serialize;
use std::io::{BufWriter, Write};

/// Creates a progress bar for monitoring function progress.
pub fn progress_bar_for_count(count: usize) -> ProgressBar {
    let style = ProgressStyle::with_template(
        "[{elapsed_precise}] [{wide_bar:.cyan/blue}] {human_pos}/{human_len} ({per_sec}, {eta})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    ProgressBar::new(count as u64).with_style(style)
}

pub fn write_json_file<T: Serialize>(
    file_name: String,
    output_directory: &str,
    data: T,
) -> Result<()> {
    let path = format!("{output_directory}/{file_name}.json");
    info!("Writing to {path}");
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &data)?;
    writer.flush()?;
    Ok(())
}

/// Renders a signed number of seconds as `[-]N days HH:MM:SS`, with
/// fractional seconds kept to millisecond precision when present.
pub fn format_duration(seconds: f64) -> String {
    let sign = if seconds < 0.0 { "-" } else { "" };
    let total_millis = (seconds.abs() * 1000.0).round() as u64;
    let millis = total_millis % 1000;
    let total_secs = total_millis / 1000;
    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;
    if millis == 0 {
        format!("{sign}{days} days {hours:02}:{minutes:02}:{secs:02}")
    } else {
        format!("{sign}{days} days {hours:02}:{minutes:02}:{secs:02}.{millis:03}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "0 days 00:00:00");
        assert_eq!(format_duration(3600.0), "0 days 01:00:00");
        assert_eq!(format_duration(90_061.5), "1 days 01:01:01.500");
        assert_eq!(format_duration(-600.0), "-0 days 00:10:00");
    }

    #[test]
    fn test_write_json_file() {
        let dir = std::env::temp_dir().join(format!("bikeshare-stats-json-{}", std::process::id()));
        fs_err::create_dir_all(&dir).unwrap();
        let dir_str = dir.to_string_lossy().to_string();
        write_json_file("counts".to_string(), &dir_str, vec![1, 2, 3]).unwrap();
        let text = fs_err::read_to_string(dir.join("counts.json")).unwrap();
        let parsed: Vec<u32> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, vec![1, 2, 3]);
        fs_err::remove_dir_all(&dir).unwrap();
    }
}
