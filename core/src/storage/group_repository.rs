use crate::models::{datetime_to_timestamp, timestamp_to_datetime, Group, GroupWithLists};
use crate::storage::ListRepository;
use crate::{Error, Result};
use rusqlite::{params, Connection, Row};

pub struct GroupRepository;

impl GroupRepository {
    /// Create a new group
    pub fn create(conn: &Connection, group: &Group) -> Result<()> {
        conn.execute(
            "INSERT INTO groups (id, name, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                group.id,
                group.name,
                datetime_to_timestamp(&group.created_at),
                datetime_to_timestamp(&group.updated_at),
            ],
        )?;
        Ok(())
    }

    /// Get a group by ID
    pub fn get_by_id(conn: &Connection, id: &str) -> Result<Group> {
        let mut stmt = conn
            .prepare("SELECT id, name, created_at, updated_at FROM groups WHERE id = ?1")?;

        let group = stmt.query_row(params![id], Self::map_row)?;

        Ok(group)
    }

    /// Get all groups, the default group first
    pub fn get_all(conn: &Connection) -> Result<Vec<Group>> {
        let mut stmt = conn.prepare(
            "SELECT id, name, created_at, updated_at FROM groups
             ORDER BY CASE WHEN id = ?1 THEN 0 ELSE 1 END, created_at, id",
        )?;

        let groups = stmt
            .query_map(params![Group::DEFAULT_ID], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(groups)
    }

    /// Rename a group. The default group's name is fixed.
    pub fn rename(conn: &Connection, id: &str, name: &str) -> Result<()> {
        if id == Group::DEFAULT_ID {
            return Err(Error::ConstraintViolation(
                "The default group cannot be renamed".to_string(),
            ));
        }

        let rows_affected = conn.execute(
            "UPDATE groups SET name = ?1, updated_at = ?2 WHERE id = ?3",
            params![
                name,
                datetime_to_timestamp(&chrono::Utc::now()),
                id,
            ],
        )?;

        if rows_affected == 0 {
            return Err(Error::NotFound(format!("Group not found: {}", id)));
        }

        Ok(())
    }

    /// Delete a group, reassigning its lists to the default group.
    pub fn delete(conn: &Connection, id: &str) -> Result<()> {
        if id == Group::DEFAULT_ID {
            return Err(Error::ConstraintViolation(
                "The default group cannot be deleted".to_string(),
            ));
        }

        let now = datetime_to_timestamp(&chrono::Utc::now());

        // Reassign and delete atomically so lists are never orphaned.
        let tx = conn.unchecked_transaction()?;
        tx.execute(
            "UPDATE lists SET group_id = ?1, updated_at = ?2 WHERE group_id = ?3",
            params![Group::DEFAULT_ID, now, id],
        )?;
        let rows_affected = tx.execute("DELETE FROM groups WHERE id = ?1", params![id])?;
        if rows_affected == 0 {
            return Err(Error::NotFound(format!("Group not found: {}", id)));
        }
        tx.commit()?;

        Ok(())
    }

    /// Get every group expanded into its lists, tasks and steps
    pub fn all_with_lists(conn: &Connection) -> Result<Vec<GroupWithLists>> {
        let groups = Self::get_all(conn)?;

        let mut result = Vec::with_capacity(groups.len());
        for group in groups {
            let lists = ListRepository::with_tasks(conn, &group.id)?;
            result.push(GroupWithLists { group, lists });
        }

        Ok(result)
    }

    fn map_row(row: &Row) -> rusqlite::Result<Group> {
        Ok(Group {
            id: row.get(0)?,
            name: row.get(1)?,
            created_at: timestamp_to_datetime(row.get(2)?),
            updated_at: timestamp_to_datetime(row.get(3)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ListColor, TaskList};
    use crate::storage::Database;
    use tempfile::tempdir;

    fn setup_test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::new(&db_path);
        let conn = db.create().unwrap();
        (dir, conn)
    }

    #[test]
    fn test_create_group() {
        let (_dir, conn) = setup_test_db();
        let group = Group::new("Work".to_string());

        GroupRepository::create(&conn, &group).unwrap();

        let retrieved = GroupRepository::get_by_id(&conn, &group.id).unwrap();
        assert_eq!(retrieved.name, "Work");
    }

    #[test]
    fn test_get_all_lists_default_first() {
        let (_dir, conn) = setup_test_db();
        GroupRepository::create(&conn, &Group::new("Work".to_string())).unwrap();

        let groups = GroupRepository::get_all(&conn).unwrap();
        assert_eq!(groups.len(), 2);
        assert!(groups[0].is_default());
        assert_eq!(groups[1].name, "Work");
    }

    #[test]
    fn test_rename_group() {
        let (_dir, conn) = setup_test_db();
        let group = Group::new("Wrok".to_string());
        GroupRepository::create(&conn, &group).unwrap();

        GroupRepository::rename(&conn, &group.id, "Work").unwrap();

        let retrieved = GroupRepository::get_by_id(&conn, &group.id).unwrap();
        assert_eq!(retrieved.name, "Work");
    }

    #[test]
    fn test_rename_default_group_rejected() {
        let (_dir, conn) = setup_test_db();
        let result = GroupRepository::rename(&conn, Group::DEFAULT_ID, "Mine");
        assert!(matches!(result, Err(Error::ConstraintViolation(_))));
    }

    #[test]
    fn test_delete_group_reassigns_lists() {
        let (_dir, conn) = setup_test_db();
        let group = Group::new("Work".to_string());
        GroupRepository::create(&conn, &group).unwrap();

        let list = TaskList::new(
            "Sprint".to_string(),
            ListColor::Blue,
            Some(group.id.clone()),
        );
        ListRepository::create(&conn, &list).unwrap();

        GroupRepository::delete(&conn, &group.id).unwrap();

        assert!(GroupRepository::get_by_id(&conn, &group.id).is_err());
        let retrieved = ListRepository::get_by_id(&conn, &list.id).unwrap();
        assert_eq!(retrieved.group_id, Group::DEFAULT_ID);
    }

    #[test]
    fn test_all_with_lists_expands_hierarchy() {
        let (_dir, conn) = setup_test_db();
        let group = Group::new("Work".to_string());
        GroupRepository::create(&conn, &group).unwrap();

        let list = TaskList::new(
            "Sprint".to_string(),
            ListColor::Blue,
            Some(group.id.clone()),
        );
        ListRepository::create(&conn, &list).unwrap();

        let tree = GroupRepository::all_with_lists(&conn).unwrap();
        assert_eq!(tree.len(), 2); // the default group plus "Work"
        assert!(tree[0].group.is_default());

        let work = tree
            .iter()
            .find(|entry| entry.group.id == group.id)
            .unwrap();
        assert_eq!(work.lists.len(), 1);
        assert_eq!(work.lists[0].list.id, list.id);
    }

    #[test]
    fn test_delete_default_group_rejected() {
        let (_dir, conn) = setup_test_db();
        let result = GroupRepository::delete(&conn, Group::DEFAULT_ID);
        assert!(matches!(result, Err(Error::ConstraintViolation(_))));
    }

    #[test]
    fn test_delete_missing_group() {
        let (_dir, conn) = setup_test_db();
        let result = GroupRepository::delete(&conn, "missing");
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
