use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq)]
pub struct Secret {
    pub arn: String,
    pub name: String,
    pub description: Option<String>,
    pub last_changed: Option<OffsetDateTime>,
}
