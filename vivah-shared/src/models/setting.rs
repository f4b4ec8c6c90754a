use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::schema::settings;

#[derive(Debug, Queryable, Identifiable, Clone)]
#[diesel(table_name = settings, primary_key(setting_key))]
pub struct Setting {
    pub setting_key: String,
    pub setting_value: String,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = settings)]
pub struct NewSetting<'a> {
    pub setting_key: &'a str,
    pub setting_value: String,
    pub updated_at: NaiveDateTime,
}
