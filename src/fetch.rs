// ABOUTME: Cursor-exhausting listings and pre-order block tree traversal
// ABOUTME: Nested children are spliced in right after their parent block

use crate::api::{DocumentSource, PageQuery};
use crate::model::{Block, Page, Paginated};
use crate::Result;

/// Follows a cursor chain until the source reports no more results.
///
/// Pages are requested strictly in sequence and appended in the order
/// received. A response that claims `has_more` without a cursor ends the
/// listing.
pub fn drain<T, F>(mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Option<&str>) -> Result<Paginated<T>>,
{
    let mut items = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = fetch(cursor.as_deref())?;
        let next = page.continuation().map(str::to_string);
        if page.has_more && next.is_none() {
            tracing::warn!("listing reported has_more without a cursor; stopping");
        }
        items.extend(page.results);

        match next {
            Some(c) => cursor = Some(c),
            None => break,
        }
    }

    Ok(items)
}

pub fn collect_pages<S: DocumentSource + ?Sized>(source: &S, query: &PageQuery) -> Result<Vec<Page>> {
    drain(|cursor| source.query_pages(query, cursor))
}

pub fn list_all_children<S: DocumentSource + ?Sized>(source: &S, block_id: &str) -> Result<Vec<Block>> {
    drain(|cursor| source.list_children(block_id, cursor))
}

/// Every block under `root_id`, flattened in document pre-order.
///
/// Uses an explicit stack of sibling iterators: a block is emitted, then if it
/// has children their listing is pushed and drained before the next sibling.
pub fn fetch_tree<S: DocumentSource + ?Sized>(source: &S, root_id: &str) -> Result<Vec<Block>> {
    let mut out = Vec::new();
    let mut stack = vec![list_all_children(source, root_id)?.into_iter()];

    while let Some(siblings) = stack.last_mut() {
        let Some(block) = siblings.next() else {
            stack.pop();
            continue;
        };

        let expand = block.has_children.then(|| block.id.clone());
        out.push(block);

        if let Some(id) = expand {
            let children = list_all_children(source, &id)?;
            tracing::debug!(block_id = %id, depth = stack.len(), count = children.len(), "expanded children");
            stack.push(children.into_iter());
        }
    }

    Ok(out)
}
