//! Shared parsing for listing-endpoint parameters.

use api_types::Pagination;
use engine::{Page, PageRequest};

use crate::ServerError;

/// Apply the defaults (`page=1`, `limit=10`) and validate the bounds.
pub(crate) fn page_request(
    page: Option<u64>,
    limit: Option<u64>,
) -> Result<PageRequest, ServerError> {
    PageRequest::new(
        page.unwrap_or(1),
        limit.unwrap_or(PageRequest::DEFAULT_LIMIT),
    )
    .map_err(ServerError::from)
}

pub(crate) fn pagination<T>(page: &Page<T>, request: PageRequest) -> Pagination {
    Pagination {
        total: page.total,
        total_pages: page.total.div_ceil(request.limit),
        current_page: request.page,
        limit: request.limit,
    }
}

/// Parse a comma-separated status list (`active,paused`). `parse` maps
/// one lowercase token to the entity's status, returning `None` for an
/// unknown token.
pub(crate) fn status_list<T>(
    raw: Option<&str>,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<Vec<T>>, ServerError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let statuses = raw
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            parse(token).ok_or_else(|| ServerError::Generic(format!("unknown status \"{token}\"")))
        })
        .collect::<Result<Vec<T>, ServerError>>()?;
    if statuses.is_empty() {
        return Ok(None);
    }
    Ok(Some(statuses))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(token: &str) -> Option<u8> {
        match token {
            "active" => Some(0),
            "paused" => Some(1),
            _ => None,
        }
    }

    #[test]
    fn splits_and_trims_status_lists() {
        let statuses = status_list(Some("active, paused"), parse).unwrap();
        assert_eq!(statuses, Some(vec![0, 1]));
    }

    #[test]
    fn rejects_unknown_tokens() {
        assert!(status_list(Some("active,bogus"), parse).is_err());
    }

    #[test]
    fn empty_input_means_no_filter() {
        assert_eq!(status_list(None, parse).unwrap(), None);
        assert_eq!(status_list(Some(""), parse).unwrap(), None);
    }

    #[test]
    fn pagination_rounds_pages_up() {
        let request = page_request(Some(2), Some(10)).unwrap();
        let page = Page {
            items: vec![1, 2, 3],
            total: 25,
        };
        let pagination = pagination(&page, request);
        assert_eq!(pagination.total_pages, 3);
        assert_eq!(pagination.current_page, 2);
        assert_eq!(pagination.limit, 10);
    }
}
