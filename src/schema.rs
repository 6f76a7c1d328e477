diesel::table! {
    patients (id) {
        id -> Int4,
        #[max_length = 255]
        name -> Varchar,
        age -> Int4,
    }
}

diesel::table! {
    appointments (id) {
        id -> Int4,
        patient_id -> Int4,
        #[max_length = 255]
        doctor -> Varchar,
        date -> Date,
        time -> Time,
    }
}

// No joinable! between appointments and patients: appointments reference a
// patient id but the tables carry no foreign key, by contract.
diesel::allow_tables_to_appear_in_same_query!(appointments, patients);
