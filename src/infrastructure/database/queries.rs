pub const SELECT_RECENT_ATTEMPTS: &str = r#"
    SELECT id, rev, total_result_ms, scramble, solution, event, unix_date
    FROM attempts
    WHERE deleted = 0
    ORDER BY unix_date DESC, id DESC
    LIMIT ?
"#;

pub const SELECT_ATTEMPT_BY_ID: &str = r#"
    SELECT id, rev, total_result_ms, scramble, solution, event, unix_date
    FROM attempts
    WHERE id = ? AND deleted = 0
"#;

pub const SELECT_REVISION_BY_ID: &str = r#"
    SELECT rev, deleted
    FROM attempts
    WHERE id = ?
"#;

pub const INSERT_ATTEMPT: &str = r#"
    INSERT INTO attempts (id, rev, total_result_ms, scramble, solution, event, unix_date, deleted, updated_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, 0, ?)
"#;

pub const UPSERT_REPLICATED_ATTEMPT: &str = r#"
    INSERT INTO attempts (id, rev, total_result_ms, scramble, solution, event, unix_date, deleted, updated_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
    ON CONFLICT(id) DO UPDATE SET
        rev = excluded.rev,
        total_result_ms = excluded.total_result_ms,
        scramble = excluded.scramble,
        solution = excluded.solution,
        event = excluded.event,
        unix_date = excluded.unix_date,
        deleted = excluded.deleted,
        updated_at = excluded.updated_at
"#;

pub const MARK_ATTEMPT_DELETED: &str = r#"
    UPDATE attempts
    SET rev = ?, deleted = 1, updated_at = ?
    WHERE id = ? AND rev = ? AND deleted = 0
"#;
