//! Diesel schema for task persistence.

diesel::table! {
    /// Task rows for the focus queue.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning user identifier.
        #[max_length = 255]
        owner_id -> Varchar,
        /// User-supplied task text.
        text -> Text,
        /// Dense order among the owner's active rows.
        position -> Int4,
        /// Completion flag.
        completed -> Bool,
        /// Completion timestamp, set exactly when the flag is raised.
        completed_at -> Nullable<Timestamptz>,
        /// Soft-delete flag; implies completion.
        archived -> Bool,
        /// Soft-delete timestamp, set exactly when the flag is raised.
        archived_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
