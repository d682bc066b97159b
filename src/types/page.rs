use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::config::PagingConfig;
use crate::error::RecipeError;
use crate::types::recipe::Recipe;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn parse(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if token.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }

    pub fn sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Recipe properties a search may be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Uuid,
    Title,
    Description,
    Instruction,
    Vegetarian,
    Servings,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub fn from_property(name: &str) -> Option<Self> {
        Some(match name {
            "id" => Self::Id,
            "uuid" => Self::Uuid,
            "title" => Self::Title,
            "description" => Self::Description,
            "instruction" => Self::Instruction,
            "vegetarian" => Self::Vegetarian,
            "servings" => Self::Servings,
            "createdAt" => Self::CreatedAt,
            "updatedAt" => Self::UpdatedAt,
            _ => return None,
        })
    }

    pub fn column(self) -> &'static str {
        match self {
            Self::Id => "r.id",
            Self::Uuid => "r.uuid",
            Self::Title => "r.title",
            Self::Description => "r.description",
            Self::Instruction => "r.instruction",
            Self::Vegetarian => "r.vegetarian",
            Self::Servings => "r.servings",
            Self::CreatedAt => "r.created_at",
            Self::UpdatedAt => "r.updated_at",
        }
    }

    pub fn compare(self, a: &Recipe, b: &Recipe) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::Uuid => a.uuid.to_string().cmp(&b.uuid.to_string()),
            Self::Title => a.title.cmp(&b.title),
            Self::Description => a.description.cmp(&b.description),
            Self::Instruction => a.instruction.cmp(&b.instruction),
            Self::Vegetarian => a.vegetarian.cmp(&b.vegetarian),
            Self::Servings => a.servings.cmp(&b.servings),
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
            Self::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: Direction,
}

impl SortOrder {
    pub fn asc(field: SortField) -> Self {
        Self {
            field,
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: SortField) -> Self {
        Self {
            field,
            direction: Direction::Desc,
        }
    }

    /// Parses one `sort` parameter: `prop[,prop...][,asc|desc]`.
    pub fn parse_param(param: &str) -> Result<Vec<Self>, RecipeError> {
        let mut tokens: Vec<&str> = param
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();
        let direction = match tokens.last().and_then(|t| Direction::parse(t)) {
            Some(dir) => {
                tokens.pop();
                dir
            }
            None => Direction::Asc,
        };
        tokens
            .into_iter()
            .map(|prop| {
                SortField::from_property(prop)
                    .map(|field| Self { field, direction })
                    .ok_or_else(|| RecipeError::invalid_parameter("sort", "a recipe property"))
            })
            .collect()
    }
}

/// Resolved pagination request: zero-based page, bounded size, sort orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Vec<SortOrder>,
}

impl PageRequest {
    pub fn of(page: u32, size: u32) -> Self {
        Self {
            page,
            size: size.max(1),
            sort: Vec::new(),
        }
    }

    pub fn sorted(mut self, sort: Vec<SortOrder>) -> Self {
        self.sort = sort;
        self
    }

    /// Resolves raw query values: negative pages become 0, missing or
    /// non-positive sizes take the default, oversized pages are clamped.
    pub fn resolve(
        page: Option<i64>,
        size: Option<i64>,
        sort: &[String],
        paging: &PagingConfig,
    ) -> Result<Self, RecipeError> {
        let page = page
            .filter(|p| *p > 0)
            .map(|p| u32::try_from(p).unwrap_or(u32::MAX))
            .unwrap_or(0);
        let size = match size {
            Some(s) if s >= 1 => u32::try_from(s).unwrap_or(u32::MAX).min(paging.max_size),
            _ => paging.default_size,
        };
        let mut orders = Vec::new();
        for param in sort {
            orders.extend(SortOrder::parse_param(param)?);
        }
        Ok(Self {
            page,
            size,
            sort: orders,
        })
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }

    /// Total order over recipes: requested sort keys, then ascending id.
    pub fn compare(&self, a: &Recipe, b: &Recipe) -> Ordering {
        self.sort
            .iter()
            .map(|order| {
                let ord = order.field.compare(a, b);
                match order.direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            })
            .find(|ord| ord.is_ne())
            .unwrap_or_else(|| a.id.cmp(&b.id))
    }
}

/// Page envelope returned by searches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page_number: u32,
    pub page_size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
    pub last: bool,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let size = u64::from(request.size.max(1));
        let total_pages = total_elements.div_ceil(size);
        Self {
            content,
            page_number: request.page,
            page_size: request.size,
            total_elements,
            total_pages,
            last: u64::from(request.page) + 1 >= total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page_number: self.page_number,
            page_size: self.page_size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            last: self.last,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paging() -> PagingConfig {
        PagingConfig {
            default_size: 10,
            max_size: 2000,
        }
    }

    #[test]
    fn page_metadata_for_eleven_items() {
        let first = Page::new(vec![0; 10], &PageRequest::of(0, 10), 11);
        assert_eq!(first.total_pages, 2);
        assert!(!first.last);

        let second = Page::new(vec![0; 1], &PageRequest::of(1, 10), 11);
        assert_eq!(second.total_pages, 2);
        assert!(second.last);
    }

    #[test]
    fn empty_page_is_last() {
        let page: Page<u8> = Page::new(Vec::new(), &PageRequest::of(0, 10), 0);
        assert_eq!(page.total_pages, 0);
        assert!(page.last);
        assert!(page.is_empty());
    }

    #[test]
    fn resolve_clamps_page_and_size() {
        let req = PageRequest::resolve(Some(-3), Some(0), &[], &paging()).expect("resolve");
        assert_eq!((req.page, req.size), (0, 10));

        let req = PageRequest::resolve(Some(4), Some(5000), &[], &paging()).expect("resolve");
        assert_eq!((req.page, req.size), (4, 2000));
        assert_eq!(req.offset(), 8000);

        let req = PageRequest::resolve(None, None, &[], &paging()).expect("resolve");
        assert_eq!((req.page, req.size), (0, 10));
    }

    #[test]
    fn sort_params_parse_direction_and_properties() {
        let sort = vec!["title,desc".to_string(), "servings,createdAt".to_string()];
        let req = PageRequest::resolve(None, None, &sort, &paging()).expect("resolve");
        assert_eq!(
            req.sort,
            vec![
                SortOrder::desc(SortField::Title),
                SortOrder::asc(SortField::Servings),
                SortOrder::asc(SortField::CreatedAt),
            ]
        );
    }

    #[test]
    fn unknown_sort_property_rejected() {
        let sort = vec!["calories,asc".to_string()];
        let err = PageRequest::resolve(None, None, &sort, &paging()).unwrap_err();
        assert!(matches!(err, RecipeError::InvalidParameter { ref name, .. } if name == "sort"));
    }

    #[test]
    fn map_keeps_metadata() {
        let page = Page::new(vec![1, 2], &PageRequest::of(0, 2), 5).map(|n| n * 10);
        assert_eq!(page.content, vec![10, 20]);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page_size, 2);
    }
}
