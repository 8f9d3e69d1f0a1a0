//! Bookmark Store for marksync.
//!
//! Defines the `BookmarkStore` collaborator the sync and cleanup code read
//! from and write to, and a SQLite implementation of it. Folders and
//! bookmarks share one table; a row with a `url` is a bookmark.

use std::collections::HashMap;

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::types::bookmark::BookmarkNode;
use crate::types::errors::StoreError;

/// Operations the service needs from whatever holds the bookmark tree.
pub trait BookmarkStore {
    /// Returns the full tree, roots in display order.
    fn get_tree(&self) -> Result<Vec<BookmarkNode>, StoreError>;
    /// Returns a single node without its children.
    fn get(&self, id: &str) -> Result<Option<BookmarkNode>, StoreError>;
    /// Removes a bookmark or an empty folder.
    fn remove(&self, id: &str) -> Result<(), StoreError>;
    fn update_title(&self, id: &str, title: &str) -> Result<(), StoreError>;
}

/// A flat row of the `bookmark_nodes` table.
struct NodeRow {
    id: String,
    parent_id: Option<String>,
    title: String,
    url: Option<String>,
    date_added: Option<i64>,
}

/// Bookmark store backed by a SQLite connection.
pub struct SqliteBookmarkStore<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteBookmarkStore<'a> {
    /// Creates a new `SqliteBookmarkStore` using the provided database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn now_millis() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    /// Computes the next position value for a child of `parent_id`.
    fn next_position(&self, parent_id: Option<&str>) -> Result<i64, StoreError> {
        let pos: i64 = match parent_id {
            Some(pid) => self.conn.query_row(
                "SELECT COALESCE(MAX(position), -1) + 1 FROM bookmark_nodes WHERE parent_id = ?1",
                params![pid],
                |row| row.get(0),
            ),
            None => self.conn.query_row(
                "SELECT COALESCE(MAX(position), -1) + 1 FROM bookmark_nodes WHERE parent_id IS NULL",
                [],
                |row| row.get(0),
            ),
        }?;
        Ok(pos)
    }

    /// Checks that `parent_id` names an existing folder.
    fn ensure_folder(&self, parent_id: &str) -> Result<(), StoreError> {
        let url: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT url FROM bookmark_nodes WHERE id = ?1",
                params![parent_id],
                |row| row.get(0),
            )
            .optional()?;
        match url {
            Some(None) => Ok(()),
            _ => Err(StoreError::InvalidParent(parent_id.to_string())),
        }
    }

    fn insert_node(
        &self,
        id: &str,
        parent_id: Option<&str>,
        title: &str,
        url: Option<&str>,
        date_added: Option<i64>,
    ) -> Result<(), StoreError> {
        if let Some(pid) = parent_id {
            self.ensure_folder(pid)?;
        }
        let position = self.next_position(parent_id)?;
        self.conn.execute(
            "INSERT INTO bookmark_nodes (id, parent_id, title, url, position, date_added) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![id, parent_id, title, url, position, date_added],
        )?;
        Ok(())
    }

    /// Creates a folder. Returns the generated folder ID.
    pub fn add_folder(&self, parent_id: Option<&str>, title: &str) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        self.insert_node(&id, parent_id, title, None, Some(Self::now_millis()))?;
        Ok(id)
    }

    /// Creates a bookmark. Returns the generated bookmark ID.
    ///
    /// `date_added` is stored as given; pass `None` for bookmarks whose
    /// creation time is unknown.
    pub fn add_bookmark(
        &self,
        parent_id: Option<&str>,
        title: &str,
        url: &str,
        date_added: Option<i64>,
    ) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        self.insert_node(&id, parent_id, title, Some(url), date_added)?;
        Ok(id)
    }

    /// Inserts a whole tree below the store's roots. Returns the number of nodes written.
    ///
    /// Node IDs are kept when present and generated when empty.
    pub fn import_tree(&self, roots: &[BookmarkNode]) -> Result<usize, StoreError> {
        let mut written = 0;
        let mut stack: Vec<(&BookmarkNode, Option<String>)> =
            roots.iter().rev().map(|node| (node, None)).collect();

        while let Some((node, parent_id)) = stack.pop() {
            let id = if node.id.is_empty() {
                Uuid::new_v4().to_string()
            } else {
                node.id.clone()
            };
            self.insert_node(
                &id,
                parent_id.as_deref(),
                &node.title,
                node.url.as_deref(),
                node.date_added,
            )?;
            written += 1;
            for child in node.children.iter().rev() {
                stack.push((child, Some(id.clone())));
            }
        }
        Ok(written)
    }

    fn row_to_node(row: &rusqlite::Row) -> rusqlite::Result<NodeRow> {
        Ok(NodeRow {
            id: row.get(0)?,
            parent_id: row.get(1)?,
            title: row.get(2)?,
            url: row.get(3)?,
            date_added: row.get(4)?,
        })
    }

    fn into_node(row: NodeRow, children: Vec<BookmarkNode>) -> BookmarkNode {
        BookmarkNode {
            id: row.id,
            title: row.title,
            url: row.url,
            date_added: row.date_added,
            children,
        }
    }
}

impl<'a> BookmarkStore for SqliteBookmarkStore<'a> {
    /// Loads every row once and assembles the tree bottom-up with an explicit stack.
    fn get_tree(&self) -> Result<Vec<BookmarkNode>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, parent_id, title, url, date_added FROM bookmark_nodes \
             ORDER BY position, rowid",
        )?;
        let mut rows: Vec<Option<NodeRow>> = Vec::new();
        for row in stmt.query_map([], Self::row_to_node)? {
            rows.push(Some(row?));
        }

        let mut children_of: HashMap<Option<String>, Vec<usize>> = HashMap::new();
        for (idx, row) in rows.iter().enumerate() {
            if let Some(row) = row {
                children_of.entry(row.parent_id.clone()).or_default().push(idx);
            }
        }

        let root_indices = children_of.get(&None).cloned().unwrap_or_default();
        let mut built: HashMap<usize, BookmarkNode> = HashMap::new();
        let mut stack: Vec<(usize, bool)> = root_indices.iter().rev().map(|&i| (i, false)).collect();

        while let Some((idx, expanded)) = stack.pop() {
            let key = rows[idx].as_ref().map(|r| Some(r.id.clone()));
            let kids = key.and_then(|k| children_of.get(&k)).cloned().unwrap_or_default();
            if expanded {
                let children = kids.iter().filter_map(|k| built.remove(k)).collect();
                if let Some(row) = rows[idx].take() {
                    built.insert(idx, Self::into_node(row, children));
                }
            } else {
                stack.push((idx, true));
                for &kid in kids.iter().rev() {
                    stack.push((kid, false));
                }
            }
        }

        Ok(root_indices.iter().filter_map(|i| built.remove(i)).collect())
    }

    fn get(&self, id: &str) -> Result<Option<BookmarkNode>, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, parent_id, title, url, date_added FROM bookmark_nodes WHERE id = ?1",
                params![id],
                Self::row_to_node,
            )
            .optional()?;
        Ok(row.map(|r| Self::into_node(r, Vec::new())))
    }

    /// Removes a bookmark by ID. Folders can only be removed once empty.
    fn remove(&self, id: &str) -> Result<(), StoreError> {
        let children: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM bookmark_nodes WHERE parent_id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        if children > 0 {
            return Err(StoreError::FolderNotEmpty(id.to_string()));
        }

        let affected = self
            .conn
            .execute("DELETE FROM bookmark_nodes WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn update_title(&self, id: &str, title: &str) -> Result<(), StoreError> {
        let affected = self.conn.execute(
            "UPDATE bookmark_nodes SET title = ?1 WHERE id = ?2",
            params![title, id],
        )?;
        if affected == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
