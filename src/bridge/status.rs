//! Status lines shown to the user after each request

use crate::bridge::{Request, Response};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Success,
    Warning,
}

/// A user-facing status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub level: StatusLevel,
    pub text: String,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = match self.level {
            StatusLevel::Success => "✓",
            StatusLevel::Warning => "⚠",
        };
        write!(f, "{} {}", mark, self.text)
    }
}

/// Builds the status line for a response
///
/// A zero count means "nothing found" or "nothing to do" and is a warning.
/// The downloaded / to-download breakdown appears only when the response
/// carries both fields.
pub fn status_for(request: Request, response: &Response) -> Status {
    let count = response.count();

    if count == 0 {
        let text = match request {
            Request::FindLinks => "No download links found",
            Request::HighlightLinks => "No links to highlight",
            Request::DownloadAll => "No files to download",
        };
        return Status {
            level: StatusLevel::Warning,
            text: text.to_string(),
        };
    }

    let text = match (request, response) {
        (Request::FindLinks, Response::Links(r)) => format!(
            "Found {} link(s) ({} downloaded, {} to download)",
            r.count, r.downloaded, r.to_download
        ),
        (Request::FindLinks, Response::Count(_)) => format!("Found {} link(s)", count),
        (Request::HighlightLinks, _) => format!("Highlighted {} link(s)", count),
        (Request::DownloadAll, _) => format!("Starting download of {} file(s)...", count),
    };

    Status {
        level: StatusLevel::Success,
        text,
    }
}

/// Status line telling the user whether they are on the archive page
pub fn page_status(on_archive_page: bool, archive_path: &str) -> Status {
    if on_archive_page {
        Status {
            level: StatusLevel::Success,
            text: "You are on the Google Takeout page".to_string(),
        }
    } else {
        Status {
            level: StatusLevel::Warning,
            text: format!("Please navigate to {}", archive_path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{CountResponse, FindLinksResponse};

    fn links_response(count: usize, downloaded: usize) -> Response {
        Response::Links(FindLinksResponse {
            count,
            downloaded,
            to_download: count - downloaded,
            links: vec![],
        })
    }

    #[test]
    fn test_find_links_with_breakdown() {
        let status = status_for(Request::FindLinks, &links_response(131, 54));
        assert_eq!(status.level, StatusLevel::Success);
        assert_eq!(
            status.text,
            "Found 131 link(s) (54 downloaded, 77 to download)"
        );
    }

    #[test]
    fn test_find_links_count_only() {
        let status = status_for(Request::FindLinks, &Response::Count(CountResponse { count: 2 }));
        assert_eq!(status.text, "Found 2 link(s)");
    }

    #[test]
    fn test_zero_counts_are_warnings() {
        let zero = Response::Count(CountResponse { count: 0 });

        let find = status_for(Request::FindLinks, &links_response(0, 0));
        let highlight = status_for(Request::HighlightLinks, &zero);
        let download = status_for(Request::DownloadAll, &zero);

        assert_eq!(find.text, "No download links found");
        assert_eq!(highlight.text, "No links to highlight");
        assert_eq!(download.text, "No files to download");
        assert!([find, highlight, download]
            .iter()
            .all(|s| s.level == StatusLevel::Warning));
    }

    #[test]
    fn test_highlight_and_download_wording() {
        let five = Response::Count(CountResponse { count: 5 });
        assert_eq!(
            status_for(Request::HighlightLinks, &five).text,
            "Highlighted 5 link(s)"
        );
        assert_eq!(
            status_for(Request::DownloadAll, &five).to_string(),
            "✓ Starting download of 5 file(s)..."
        );
    }

    #[test]
    fn test_page_status() {
        assert_eq!(page_status(true, "x").level, StatusLevel::Success);
        let warning = page_status(false, "takeout.google.com/manage/archive");
        assert_eq!(
            warning.text,
            "Please navigate to takeout.google.com/manage/archive"
        );
    }
}
