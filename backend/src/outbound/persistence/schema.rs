//! Diesel table definitions mirroring `migrations/`.

diesel::table! {
    segments (id) {
        id -> Int8,
        #[max_length = 255]
        slug -> Varchar,
    }
}

diesel::table! {
    user_segments (user_id, segment_id) {
        user_id -> Int8,
        segment_id -> Int8,
    }
}

diesel::table! {
    operations (id) {
        id -> Int8,
        user_id -> Int8,
        #[max_length = 255]
        segment_slug -> Varchar,
        kind -> Int2,
        recorded_at -> Timestamptz,
    }
}

diesel::joinable!(user_segments -> segments (segment_id));

diesel::allow_tables_to_appear_in_same_query!(operations, segments, user_segments);
