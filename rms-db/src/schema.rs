diesel::table! {
    trains (id) {
        id -> Int4,
        train_no -> Varchar,
        name_en -> Varchar,
        name_hi -> Varchar,
        source_code -> Varchar,
        source_name_en -> Varchar,
        source_name_hi -> Varchar,
        dest_code -> Varchar,
        dest_name_en -> Varchar,
        dest_name_hi -> Varchar,
        sta -> Varchar,
        eta -> Varchar,
        #[sql_name = "std"]
        std_ -> Varchar,
        etd -> Varchar,
        platform_no -> Nullable<Int4>,
        status -> Varchar,
        is_arrival -> Bool,
        coaches -> Array<Text>,
        station_code -> Varchar,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    stations (id) {
        id -> Int4,
        code -> Varchar,
        name_en -> Varchar,
        name_hi -> Varchar,
        name_regional -> Nullable<Varchar>,
        latitude -> Float8,
        longitude -> Float8,
        platform_count -> Int4,
        entrance_count -> Int4,
        bridge_count -> Int4,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    station_devices (id) {
        id -> Int4,
        station_code -> Varchar,
        platforms -> Jsonb,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    cap_alerts (id) {
        id -> Int4,
        identifier -> Varchar,
        sender -> Varchar,
        sent -> Timestamp,
        category -> Varchar,
        event -> Varchar,
        urgency -> Varchar,
        severity -> Varchar,
        certainty -> Varchar,
        headline -> Varchar,
        description -> Nullable<Text>,
        effective -> Timestamp,
        expires -> Timestamp,
        areas -> Jsonb,
        created_at -> Timestamp,
    }
}

diesel::table! {
    event_logs (id) {
        id -> Int4,
        event_id -> Int8,
        occurred_at -> Timestamp,
        event_type -> Varchar,
        source -> Varchar,
        description -> Nullable<Text>,
        sent_to_server -> Bool,
        station_code -> Varchar,
        created_at -> Timestamp,
    }
}

diesel::table! {
    users (id) {
        id -> Int4,
        email -> Varchar,
        hash_pwd -> Varchar,
        full_name -> Nullable<Varchar>,
        phone -> Nullable<Varchar>,
        profile_image -> Nullable<Varchar>,
        verify_code -> Nullable<Varchar>,
        is_verified -> Bool,
        reset_code -> Nullable<Varchar>,
        reset_expires -> Nullable<Timestamp>,
        user_role -> Varchar,
        created_at -> Timestamp,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    trains,
    stations,
    station_devices,
    cap_alerts,
    event_logs,
    users,
);
