use roster_core::{
    ErrorKind, FileUserRepository, InitOutcome, RepoError, UpdateUserRequest, UserRecord,
    UserRepository, UserValidationError,
};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn fresh_store() -> (TempDir, FileUserRepository) {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileUserRepository::new(dir.path().join("user_data.txt"));
    repo.initialize().unwrap();
    (dir, repo)
}

fn store_with(content: &str) -> (TempDir, FileUserRepository) {
    let (dir, repo) = fresh_store();
    fs::write(repo.path(), content).unwrap();
    (dir, repo)
}

fn read(repo: &FileUserRepository) -> String {
    fs::read_to_string(repo.path()).unwrap()
}

fn user(id: &str, name: &str, email: &str) -> UserRecord {
    UserRecord::new(id, name, email).unwrap()
}

#[test]
fn initialize_creates_header_only_file() {
    let dir = tempfile::tempdir().unwrap();
    let path: PathBuf = dir.path().join("user_data.txt");
    let repo = FileUserRepository::new(&path);

    assert_eq!(repo.initialize().unwrap(), InitOutcome::Created);
    assert_eq!(fs::read_to_string(&path).unwrap(), "ID,Name,Email\n");
}

#[test]
fn initialize_on_existing_file_keeps_content() {
    let (_dir, repo) = store_with("ID,Name,Email\n1,John Doe,john@example.com\n");

    assert_eq!(repo.initialize().unwrap(), InitOutcome::AlreadyExists);
    assert_eq!(read(&repo), "ID,Name,Email\n1,John Doe,john@example.com\n");
}

#[test]
fn create_then_list_returns_the_record() {
    let (_dir, repo) = fresh_store();

    repo.create_user(&user("1", "John Doe", "john@example.com"))
        .unwrap();

    let users = repo.list_users().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].to_line(), "1,John Doe,john@example.com");
    assert_eq!(read(&repo), "ID,Name,Email\n1,John Doe,john@example.com\n");
}

#[test]
fn create_with_any_field_blank_is_rejected_without_write() {
    let (_dir, repo) = fresh_store();
    let cases = [
        ("", "John Doe", "john@example.com"),
        ("1", "", "john@example.com"),
        ("1", "John Doe", ""),
    ];

    for (id, name, email) in cases {
        let record = UserRecord {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
        };
        let err = repo.create_user(&record).unwrap_err();
        assert!(
            matches!(err, RepoError::Validation(UserValidationError::MissingFields)),
            "({id:?}, {name:?}, {email:?}) gave {err:?}"
        );
        assert_eq!(read(&repo), "ID,Name,Email\n");
    }
}

#[test]
fn create_rewrites_whole_file_without_leftovers() {
    let (dir, repo) = store_with("ID,Name,Email\n1,John Doe,john@example.com");

    repo.create_user(&user("2", "Jane Doe", "jane@example.com"))
        .unwrap();

    assert_eq!(
        read(&repo),
        "ID,Name,Email\n1,John Doe,john@example.com\n2,Jane Doe,jane@example.com\n"
    );
    let entries = fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(entries, 1, "temp files left next to the store");
}

#[test]
fn create_with_bad_email_is_rejected_without_write() {
    let (_dir, repo) = fresh_store();
    let bad_email = UserRecord {
        id: "1".to_string(),
        name: "John".to_string(),
        email: "john.example.com".to_string(),
    };

    let err = repo.create_user(&bad_email).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(UserValidationError::InvalidEmail(_))
    ));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(read(&repo), "ID,Name,Email\n");
}

#[test]
fn duplicate_id_is_rejected() {
    let (_dir, repo) = fresh_store();
    repo.create_user(&user("1", "John Doe", "john@example.com"))
        .unwrap();

    let err = repo
        .create_user(&user("1", "Jane Doe", "jane@example.com"))
        .unwrap_err();
    assert!(matches!(err, RepoError::DuplicateId(ref id) if id == "1"));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(repo.list_users().unwrap().len(), 1);
}

#[test]
fn header_word_is_not_treated_as_existing_id() {
    let (_dir, repo) = fresh_store();

    repo.create_user(&user("ID", "Header Lookalike", "h@example.com"))
        .unwrap();
    assert_eq!(repo.list_users().unwrap()[0].id, "ID");
}

#[test]
fn list_preserves_insertion_order() {
    let (_dir, repo) = fresh_store();
    let ids = ["7", "3", "11", "1", "5"];
    for id in ids {
        repo.create_user(&user(id, &format!("User {id}"), &format!("u{id}@example.com")))
            .unwrap();
    }

    let listed: Vec<String> = repo
        .list_users()
        .unwrap()
        .into_iter()
        .map(|record| record.id)
        .collect();
    assert_eq!(listed, ids);
}

#[test]
fn list_on_header_only_store_is_empty_not_error() {
    let (_dir, repo) = fresh_store();
    assert!(repo.list_users().unwrap().is_empty());
}

#[test]
fn list_without_initialize_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileUserRepository::new(dir.path().join("never_created.txt"));

    let err = repo.list_users().unwrap_err();
    assert!(matches!(err, RepoError::StoreMissing(_)));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn update_replaces_name_and_email() {
    let (_dir, repo) = store_with("ID,Name,Email\n1,Old Name,old@example.com\n");

    let updated = repo
        .update_user(
            &UpdateUserRequest::new("1")
                .name("New Name")
                .email("new@example.com"),
        )
        .unwrap();

    assert_eq!(updated.to_line(), "1,New Name,new@example.com");
    assert_eq!(read(&repo), "ID,Name,Email\n1,New Name,new@example.com\n");
}

#[test]
fn update_with_blank_values_keeps_fields() {
    let (_dir, repo) = store_with(
        "ID,Name,Email\n1,Old Name,old@example.com\n2,Other,other@example.com\n",
    );

    repo.update_user(&UpdateUserRequest::new("1").name("  ").email("fresh@example.com"))
        .unwrap();

    assert_eq!(
        read(&repo),
        "ID,Name,Email\n1,Old Name,fresh@example.com\n2,Other,other@example.com\n"
    );
}

#[test]
fn update_unknown_id_leaves_file_byte_identical() {
    let original = "ID,Name,Email\n1,Old Name,old@example.com";
    let (_dir, repo) = store_with(original);

    let err = repo
        .update_user(&UpdateUserRequest::new("999").name("Nobody"))
        .unwrap_err();

    assert!(matches!(err, RepoError::NotFound(ref id) if id == "999"));
    assert_eq!(err.to_string(), "User ID 999 not found.");
    assert_eq!(read(&repo), original);
}

#[test]
fn update_with_invalid_email_fails_before_lookup() {
    let (_dir, repo) = store_with("ID,Name,Email\n1,Old Name,old@example.com\n");

    let err = repo
        .update_user(&UpdateUserRequest::new("999").email("broken"))
        .unwrap_err();

    assert!(matches!(
        err,
        RepoError::Validation(UserValidationError::InvalidEmail(_))
    ));
    assert_eq!(read(&repo), "ID,Name,Email\n1,Old Name,old@example.com\n");
}

#[test]
fn update_and_delete_require_id() {
    let (_dir, repo) = fresh_store();

    let update_err = repo.update_user(&UpdateUserRequest::new(" ")).unwrap_err();
    let delete_err = repo.delete_user("").unwrap_err();

    for err in [update_err, delete_err] {
        assert!(matches!(
            err,
            RepoError::Validation(UserValidationError::MissingId)
        ));
    }
}

#[test]
fn delete_last_record_leaves_header_only() {
    let (_dir, repo) = store_with("ID,Name,Email\n1,John Doe,john@example.com\n");

    let removed = repo.delete_user("1").unwrap();

    assert_eq!(removed.name, "John Doe");
    assert_eq!(read(&repo), "ID,Name,Email\n");
    assert!(repo.list_users().unwrap().is_empty());
}

#[test]
fn delete_keeps_order_of_remaining_records() {
    let (_dir, repo) = store_with(
        "ID,Name,Email\n1,A,a@example.com\n2,B,b@example.com\n3,C,c@example.com\n",
    );

    repo.delete_user("2").unwrap();

    assert_eq!(
        read(&repo),
        "ID,Name,Email\n1,A,a@example.com\n3,C,c@example.com\n"
    );
}

#[test]
fn delete_unknown_id_leaves_store_unchanged() {
    let original = "ID,Name,Email\n1,John Doe,john@example.com\n";
    let (_dir, repo) = store_with(original);

    let err = repo.delete_user("42").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(read(&repo), original);
}

#[test]
fn malformed_rows_are_reported_as_invalid_data() {
    let original = "ID,Name,Email\n1,Doe, John,john@example.com\n";
    let (_dir, repo) = store_with(original);

    let err = repo.delete_user("1").unwrap_err();

    assert!(matches!(err, RepoError::InvalidData(_)));
    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(read(&repo), original);
}

#[cfg(unix)]
#[test]
fn rewrite_preserves_file_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, repo) = store_with("ID,Name,Email\n1,A,a@example.com\n");
    fs::set_permissions(repo.path(), fs::Permissions::from_mode(0o640)).unwrap();

    repo.delete_user("1").unwrap();

    let mode = fs::metadata(repo.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o640);
}
