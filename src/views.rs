//! Human-facing HTML pages

use crate::protocol::FileRecord;

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:2rem;background:#0f172a;color:#e2e8f0}\
a{color:#38bdf8}table{border-collapse:collapse;width:100%}\
th,td{text-align:left;padding:.35rem .6rem;border-bottom:1px solid #334155}\
pre{background:#020617;padding:1rem;overflow-x:auto;white-space:pre-wrap}";

/// Listing of every file in the data directory
pub fn render_index(records: &[FileRecord]) -> String {
    let mut rows = String::new();
    for record in records {
        rows.push_str(&format!(
            "<tr><td><a href=\"/log/{}\">{}</a></td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            encode_path(&record.name),
            escape_html(&record.display_name),
            escape_html(&record.category),
            human_size(record.size_bytes),
            record.modified_at.format("%Y-%m-%d %H:%M:%S"),
        ));
    }

    let body = if records.is_empty() {
        "<p>No log files found.</p>".to_string()
    } else {
        format!(
            "<table><thead><tr><th>File</th><th>Category</th><th>Size</th><th>Modified</th></tr></thead>\n<tbody>\n{}</tbody></table>",
            rows
        )
    };

    page(
        "Log Files",
        &format!(
            "<h1>Log Files</h1><p>{} file(s)</p>\n{}",
            records.len(),
            body
        ),
    )
}

/// Full content of one file
pub fn render_log(filename: &str, content: &str) -> String {
    let title = escape_html(filename);
    page(
        filename,
        &format!(
            "<p><a href=\"/\">&larr; All logs</a></p><h1>{}</h1>\n<pre>{}</pre>",
            title,
            escape_html(content)
        ),
    )
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{}</title>\
<link rel=\"icon\" href=\"/favicon.ico\" type=\"image/svg+xml\"><style>{}</style></head>\n<body>{}</body></html>\n",
        escape_html(title),
        STYLE,
        body
    )
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Percent-encode each segment of a `/`-separated name, keeping the slashes
fn encode_path(name: &str) -> String {
    name.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut size = bytes as f64 / 1024.0;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", size, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn record(name: &str, category: &str, size: u64) -> FileRecord {
        FileRecord {
            name: name.to_string(),
            display_name: name.rsplit('/').next().unwrap_or(name).to_string(),
            absolute_path: format!("/data/{}", name),
            size_bytes: size,
            modified_at: Local::now(),
            category: category.to_string(),
        }
    }

    #[test]
    fn escape_html_replaces_markup_characters() {
        assert_eq!(
            escape_html("<script>alert('x') & \"y\"</script>"),
            "&lt;script&gt;alert(&#39;x&#39;) &amp; &quot;y&quot;&lt;/script&gt;"
        );
    }

    #[test]
    fn index_links_nested_files_with_encoded_segments() {
        let html = render_index(&[record("miner/gpu 0.log", "miner", 2048)]);
        assert!(html.contains("href=\"/log/miner/gpu%200.log\""));
        assert!(html.contains(">gpu 0.log</a>"));
        assert!(html.contains("2.0 KB"));
    }

    #[test]
    fn index_without_files_says_so() {
        let html = render_index(&[]);
        assert!(html.contains("No log files found."));
    }

    #[test]
    fn log_view_escapes_content() {
        let html = render_log("app.log", "<b>bold</b>\n");
        assert!(html.contains("<pre>&lt;b&gt;bold&lt;/b&gt;\n</pre>"));
    }

    #[test]
    fn human_size_scales_units() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(1536), "1.5 KB");
        assert_eq!(human_size(5 * 1024 * 1024), "5.0 MB");
    }
}
