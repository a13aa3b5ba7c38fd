use crate::StreamEntry;

pub const FORMAT_DESCRIPTION: &str = "频道,链接";

/// Render the output file.
///
/// Non-empty input gives a `#` header block (generation time, count, format)
/// followed by one `channel,url` line per entry. Empty input gives a single
/// placeholder comment line so the file is never zero bytes.
pub fn render_document(entries: &[StreamEntry], generated_at: &str, keyword: &str) -> String {
    if entries.is_empty() {
        return format!("# 未找到{keyword}直播源 ({generated_at})\n");
    }

    let mut doc = String::new();
    doc.push_str(&format!("# 抓取时间: {generated_at}\n"));
    doc.push_str(&format!("# 共找到 {} 个{keyword}直播源\n", entries.len()));
    doc.push_str(&format!("# 格式: {FORMAT_DESCRIPTION}\n\n"));
    for entry in entries {
        doc.push_str(&entry.to_line());
        doc.push('\n');
    }
    doc
}
