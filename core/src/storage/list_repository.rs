use crate::models::{
    datetime_to_timestamp, timestamp_to_datetime, Group, ListColor, ListWithTasks, TaskList,
};
use crate::storage::TaskRepository;
use crate::{Error, Result};
use rusqlite::{params, Connection, Row};

const LIST_COLUMNS: &str = "id, name, color, group_id, created_at, updated_at";

pub struct ListRepository;

impl ListRepository {
    /// Create a new list
    pub fn create(conn: &Connection, list: &TaskList) -> Result<()> {
        conn.execute(
            "INSERT INTO lists (id, name, color, group_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                list.id,
                list.name,
                list.color.to_string(),
                list.group_id,
                datetime_to_timestamp(&list.created_at),
                datetime_to_timestamp(&list.updated_at),
            ],
        )?;
        Ok(())
    }

    /// Get a list by ID
    pub fn get_by_id(conn: &Connection, id: &str) -> Result<TaskList> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {LIST_COLUMNS} FROM lists WHERE id = ?1"
        ))?;

        let list = stmt.query_row(params![id], Self::map_row)?;

        Ok(list)
    }

    /// Get all lists
    pub fn get_all(conn: &Connection) -> Result<Vec<TaskList>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {LIST_COLUMNS} FROM lists ORDER BY created_at, id"
        ))?;

        let lists = stmt
            .query_map([], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(lists)
    }

    /// Get the lists of one group
    pub fn by_group(conn: &Connection, group_id: &str) -> Result<Vec<TaskList>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {LIST_COLUMNS} FROM lists WHERE group_id = ?1 ORDER BY created_at, id"
        ))?;

        let lists = stmt
            .query_map(params![group_id], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(lists)
    }

    /// Get a group's lists together with the ungrouped ones, ungrouped
    /// first. Browsing any group also surfaces lists that were never filed
    /// under one.
    pub fn with_ungrouped(conn: &Connection, group_id: &str) -> Result<Vec<TaskList>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {LIST_COLUMNS} FROM lists
             WHERE group_id = ?1 OR group_id = ?2
             ORDER BY CASE WHEN group_id = ?1 THEN 0 ELSE 1 END, created_at, id"
        ))?;

        let lists = stmt
            .query_map(params![Group::DEFAULT_ID, group_id], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(lists)
    }

    /// Rename a list
    pub fn rename(conn: &Connection, id: &str, name: &str) -> Result<()> {
        Self::touch_update(
            conn,
            "UPDATE lists SET name = ?1, updated_at = ?2 WHERE id = ?3",
            params![name, datetime_to_timestamp(&chrono::Utc::now()), id],
            id,
        )
    }

    /// Change a list's color
    pub fn set_color(conn: &Connection, id: &str, color: ListColor) -> Result<()> {
        Self::touch_update(
            conn,
            "UPDATE lists SET color = ?1, updated_at = ?2 WHERE id = ?3",
            params![
                color.to_string(),
                datetime_to_timestamp(&chrono::Utc::now()),
                id
            ],
            id,
        )
    }

    /// Move a list to another group (None moves it back to the default
    /// group)
    pub fn move_to_group(conn: &Connection, id: &str, group_id: Option<&str>) -> Result<()> {
        let group_id = group_id.unwrap_or(Group::DEFAULT_ID);
        Self::touch_update(
            conn,
            "UPDATE lists SET group_id = ?1, updated_at = ?2 WHERE id = ?3",
            params![group_id, datetime_to_timestamp(&chrono::Utc::now()), id],
            id,
        )
    }

    /// Delete a list; its tasks and their steps cascade away.
    pub fn delete(conn: &Connection, id: &str) -> Result<()> {
        let rows_affected = conn.execute("DELETE FROM lists WHERE id = ?1", params![id])?;

        if rows_affected == 0 {
            return Err(Error::NotFound(format!("List not found: {}", id)));
        }

        Ok(())
    }

    /// Get every list expanded into tasks and steps
    pub fn all_with_tasks(conn: &Connection) -> Result<Vec<ListWithTasks>> {
        Self::expand(conn, Self::get_all(conn)?)
    }

    /// Get one group's lists expanded into tasks and steps
    pub fn with_tasks(conn: &Connection, group_id: &str) -> Result<Vec<ListWithTasks>> {
        Self::expand(conn, Self::by_group(conn, group_id)?)
    }

    fn expand(conn: &Connection, lists: Vec<TaskList>) -> Result<Vec<ListWithTasks>> {
        let mut result = Vec::with_capacity(lists.len());
        for list in lists {
            let tasks = TaskRepository::with_steps_by_list(conn, &list.id)?;
            result.push(ListWithTasks { list, tasks });
        }
        Ok(result)
    }

    fn touch_update(
        conn: &Connection,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
        id: &str,
    ) -> Result<()> {
        let rows_affected = conn.execute(sql, params)?;

        if rows_affected == 0 {
            return Err(Error::NotFound(format!("List not found: {}", id)));
        }

        Ok(())
    }

    fn map_row(row: &Row) -> rusqlite::Result<TaskList> {
        Ok(TaskList {
            id: row.get(0)?,
            name: row.get(1)?,
            color: ListColor::from_str(&row.get::<_, String>(2)?).unwrap_or_default(),
            group_id: row.get(3)?,
            created_at: timestamp_to_datetime(row.get(4)?),
            updated_at: timestamp_to_datetime(row.get(5)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Database, GroupRepository};
    use tempfile::tempdir;

    fn setup_test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::new(&db_path);
        let conn = db.create().unwrap();
        (dir, conn)
    }

    fn make_group(conn: &Connection, name: &str) -> Group {
        let group = Group::new(name.to_string());
        GroupRepository::create(conn, &group).unwrap();
        group
    }

    #[test]
    fn test_create_list() {
        let (_dir, conn) = setup_test_db();
        let list = TaskList::new("Groceries".to_string(), ListColor::Green, None);

        ListRepository::create(&conn, &list).unwrap();

        let retrieved = ListRepository::get_by_id(&conn, &list.id).unwrap();
        assert_eq!(retrieved.name, "Groceries");
        assert_eq!(retrieved.color, ListColor::Green);
        assert_eq!(retrieved.group_id, Group::DEFAULT_ID);
    }

    #[test]
    fn test_by_group() {
        let (_dir, conn) = setup_test_db();
        let group1 = make_group(&conn, "group1");
        let group2 = make_group(&conn, "group2");

        let list1 = TaskList::new(
            "list1".to_string(),
            ListColor::Blue,
            Some(group1.id.clone()),
        );
        let list2 = TaskList::new(
            "list2".to_string(),
            ListColor::Blue,
            Some(group2.id.clone()),
        );
        ListRepository::create(&conn, &list1).unwrap();
        ListRepository::create(&conn, &list2).unwrap();

        let lists = ListRepository::by_group(&conn, &group1.id).unwrap();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].id, list1.id);
    }

    #[test]
    fn test_with_ungrouped_surfaces_default_lists_first() {
        let (_dir, conn) = setup_test_db();
        let group1 = make_group(&conn, "group1");
        let group2 = make_group(&conn, "group2");

        let base = chrono::Utc::now();
        let mut list1 = TaskList::new(
            "list1".to_string(),
            ListColor::Blue,
            Some(group1.id.clone()),
        );
        let mut list2 = TaskList::new(
            "list2".to_string(),
            ListColor::Blue,
            Some(group2.id.clone()),
        );
        let mut list3 = TaskList::new("list3".to_string(), ListColor::Blue, None);
        let mut list4 = TaskList::new("list4".to_string(), ListColor::Blue, None);
        for (offset, list) in [&mut list1, &mut list2, &mut list3, &mut list4]
            .into_iter()
            .enumerate()
        {
            // Distinct creation seconds keep the ordering deterministic.
            list.created_at = base + chrono::Duration::seconds(offset as i64);
            list.updated_at = list.created_at;
            ListRepository::create(&conn, list).unwrap();
        }

        let lists = ListRepository::with_ungrouped(&conn, &group1.id).unwrap();
        let ids: Vec<_> = lists.iter().map(|list| list.id.clone()).collect();
        assert_eq!(ids, vec![list3.id.clone(), list4.id.clone(), list1.id]);

        // An unknown group still surfaces the ungrouped lists.
        let lists = ListRepository::with_ungrouped(&conn, "unknown").unwrap();
        let ids: Vec<_> = lists.iter().map(|list| list.id.clone()).collect();
        assert_eq!(ids, vec![list3.id, list4.id]);
    }

    #[test]
    fn test_rename_and_set_color() {
        let (_dir, conn) = setup_test_db();
        let list = TaskList::new("Grceries".to_string(), ListColor::Blue, None);
        ListRepository::create(&conn, &list).unwrap();

        ListRepository::rename(&conn, &list.id, "Groceries").unwrap();
        ListRepository::set_color(&conn, &list.id, ListColor::Orange).unwrap();

        let retrieved = ListRepository::get_by_id(&conn, &list.id).unwrap();
        assert_eq!(retrieved.name, "Groceries");
        assert_eq!(retrieved.color, ListColor::Orange);
    }

    #[test]
    fn test_move_to_group_and_back() {
        let (_dir, conn) = setup_test_db();
        let group = make_group(&conn, "Work");
        let list = TaskList::new("Sprint".to_string(), ListColor::Blue, None);
        ListRepository::create(&conn, &list).unwrap();

        ListRepository::move_to_group(&conn, &list.id, Some(&group.id)).unwrap();
        assert_eq!(
            ListRepository::get_by_id(&conn, &list.id).unwrap().group_id,
            group.id
        );

        ListRepository::move_to_group(&conn, &list.id, None).unwrap();
        assert_eq!(
            ListRepository::get_by_id(&conn, &list.id).unwrap().group_id,
            Group::DEFAULT_ID
        );
    }

    #[test]
    fn test_with_tasks_expands_hierarchy() {
        let (_dir, conn) = setup_test_db();
        let group = make_group(&conn, "Work");

        let list1 = TaskList::new(
            "Sprint".to_string(),
            ListColor::Blue,
            Some(group.id.clone()),
        );
        let list2 = TaskList::new("Groceries".to_string(), ListColor::Green, None);
        ListRepository::create(&conn, &list1).unwrap();
        ListRepository::create(&conn, &list2).unwrap();

        let task = crate::models::Task::new("Write report".to_string(), list1.id.clone());
        crate::storage::TaskRepository::create(&conn, &task).unwrap();
        let step = crate::models::Step::new("Draft".to_string(), task.id.clone());
        crate::storage::StepRepository::create(&conn, &step).unwrap();

        let expanded = ListRepository::with_tasks(&conn, &group.id).unwrap();
        assert_eq!(expanded.len(), 1);
        assert_eq!(expanded[0].list.id, list1.id);
        assert_eq!(expanded[0].tasks.len(), 1);
        assert_eq!(expanded[0].tasks[0].task.id, task.id);
        assert_eq!(expanded[0].tasks[0].steps.len(), 1);

        let all = ListRepository::all_with_tasks(&conn).unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().any(|entry| entry.list.id == list2.id));
    }

    #[test]
    fn test_delete_missing_list() {
        let (_dir, conn) = setup_test_db();
        let result = ListRepository::delete(&conn, "missing");
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_unknown_color_falls_back_to_blue() {
        let (_dir, conn) = setup_test_db();
        let list = TaskList::new("Inbox".to_string(), ListColor::Red, None);
        ListRepository::create(&conn, &list).unwrap();

        conn.execute(
            "UPDATE lists SET color = 'chartreuse' WHERE id = ?1",
            params![list.id],
        )
        .unwrap();

        let retrieved = ListRepository::get_by_id(&conn, &list.id).unwrap();
        assert_eq!(retrieved.color, ListColor::Blue);
    }
}
