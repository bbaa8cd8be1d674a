//! Resident records.
//!
//! Character records are immutable display data supplied wholesale by a
//! roster (the built-in one or a JSON file). The console only ever selects
//! them by id or by name.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::RosterError;

/// Numeric resident identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterId(pub u32);

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A resident of the apartment.
///
/// Personality, relationships and memories are inert display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub age: u32,
    pub gender: String,
    #[serde(default)]
    pub personality: String,
    #[serde(default)]
    pub skills: Vec<String>,
    /// Other resident's name -> how this resident sees them.
    #[serde(default)]
    pub relationships: BTreeMap<String, String>,
    #[serde(default)]
    pub short_term_memory: Vec<String>,
    #[serde(default)]
    pub long_term_memory: Vec<String>,
    pub current_room: String,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    "gray".to_string()
}

impl Character {
    /// A resident with only the fields the roster listing shows.
    pub fn new(
        id: u32,
        name: impl Into<String>,
        age: u32,
        gender: impl Into<String>,
        current_room: impl Into<String>,
    ) -> Self {
        Self {
            id: CharacterId(id),
            name: name.into(),
            age,
            gender: gender.into(),
            personality: String::new(),
            skills: Vec::new(),
            relationships: BTreeMap::new(),
            short_term_memory: Vec::new(),
            long_term_memory: Vec::new(),
            current_room: current_room.into(),
            color: default_color(),
        }
    }

    pub fn with_personality(mut self, personality: impl Into<String>) -> Self {
        self.personality = personality.into();
        self
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_relationship(mut self, other: impl Into<String>, note: impl Into<String>) -> Self {
        self.relationships.insert(other.into(), note.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// One-line summary used by the `list` command.
    pub fn summary(&self) -> String {
        format!(
            "{} ({}岁, {}, 在{})",
            self.name, self.age, self.gender, self.current_room
        )
    }
}

/// The ordered set of known residents.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    characters: Vec<Character>,
}

impl Roster {
    /// Build a roster, rejecting duplicate ids.
    pub fn new(characters: Vec<Character>) -> Result<Self, RosterError> {
        let mut seen = HashSet::new();
        for character in &characters {
            if !seen.insert(character.id) {
                return Err(RosterError::DuplicateId(character.id.0));
            }
        }
        Ok(Self { characters })
    }

    /// Load a roster from a JSON array of character records.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RosterError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse a roster from a JSON array of character records.
    pub fn from_json(json: &str) -> Result<Self, RosterError> {
        let characters: Vec<Character> = serde_json::from_str(json)?;
        if characters.is_empty() {
            return Err(RosterError::Empty);
        }
        Self::new(characters)
    }

    /// Case-sensitive exact lookup by display name.
    pub fn find_by_name(&self, name: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.name == name)
    }

    pub fn find_by_id(&self, id: CharacterId) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Character> {
        self.characters.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Character> {
        self.characters.get(index)
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}

/// The built-in five residents.
pub static DEFAULT_ROSTER: Lazy<Roster> = Lazy::new(|| Roster {
    characters: vec![
        resident(
            1,
            "李明",
            28,
            "男",
            "内向但友善，喜欢安静的环境",
            &["编程", "烹饪", "摄影"],
            &[
                ("张伟", "室友，关系一般"),
                ("王芳", "暗恋对象"),
                ("赵静", "朋友"),
                ("刘强", "不太熟悉"),
            ],
            &["昨天在客厅看电视", "今天需要完成编程项目", "冰箱里的牛奶快喝完了"],
            &["大学计算机专业毕业", "两年前搬入这所公寓", "小时候养过一只猫"],
            "客厅",
            "red",
        ),
        resident(
            2,
            "张伟",
            31,
            "男",
            "外向健谈，偶尔有些邋遢",
            &["健身", "吉他", "修理电器"],
            &[
                ("李明", "室友，觉得他太安静"),
                ("王芳", "普通朋友"),
                ("赵静", "经常一起做饭"),
                ("刘强", "健身搭档"),
            ],
            &["早上在阳台锻炼", "洗碗池里的碗还没洗", "约了刘强晚上去健身房"],
            &["做过三年销售", "高中时组过乐队", "第一个搬进这所公寓"],
            "阳台",
            "blue",
        ),
        resident(
            3,
            "王芳",
            26,
            "女",
            "开朗热情，有点完美主义",
            &["绘画", "瑜伽", "烘焙"],
            &[
                ("李明", "觉得他人不错"),
                ("张伟", "嫌他不爱收拾"),
                ("赵静", "最好的朋友"),
                ("刘强", "点头之交"),
            ],
            &["昨晚画完了一幅水彩", "厨房的烤箱有点问题", "周末想去看画展"],
            &["美术学院毕业", "在设计公司工作", "曾经在国外交换一年"],
            "厨房",
            "pink",
        ),
        resident(
            4,
            "赵静",
            29,
            "女",
            "冷静理性，说话直接",
            &["阅读", "理财", "围棋"],
            &[
                ("李明", "朋友，常借书给他"),
                ("张伟", "做饭搭档"),
                ("王芳", "最好的朋友"),
                ("刘强", "觉得他太吵"),
            ],
            &["正在读一本推理小说", "提醒大家交这个月的房租", "楼下快递还没取"],
            &["会计师资格证持有者", "从小在北方长大", "搬来前独居了五年"],
            "卧室B",
            "green",
        ),
        resident(
            5,
            "刘强",
            24,
            "男",
            "精力充沛，做事冲动",
            &["篮球", "游戏", "街舞"],
            &[
                ("李明", "不太熟悉"),
                ("张伟", "健身搭档"),
                ("王芳", "想认识一下"),
                ("赵静", "有点怕她"),
            ],
            &["昨晚打游戏到凌晨", "卫生间的灯泡坏了", "下午有篮球比赛"],
            &["刚毕业一年", "大学篮球队队长", "三个月前搬进公寓"],
            "卫生间",
            "yellow",
        ),
    ],
});

#[allow(clippy::too_many_arguments)]
fn resident(
    id: u32,
    name: &str,
    age: u32,
    gender: &str,
    personality: &str,
    skills: &[&str],
    relationships: &[(&str, &str)],
    short_term_memory: &[&str],
    long_term_memory: &[&str],
    current_room: &str,
    color: &str,
) -> Character {
    Character {
        id: CharacterId(id),
        name: name.to_string(),
        age,
        gender: gender.to_string(),
        personality: personality.to_string(),
        skills: skills.iter().map(|s| s.to_string()).collect(),
        relationships: relationships
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        short_term_memory: short_term_memory.iter().map(|s| s.to_string()).collect(),
        long_term_memory: long_term_memory.iter().map(|s| s.to_string()).collect(),
        current_room: current_room.to_string(),
        color: color.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roster_has_five_residents() {
        assert_eq!(DEFAULT_ROSTER.len(), 5);
        let ids: Vec<u32> = DEFAULT_ROSTER.iter().map(|c| c.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_summary_format() {
        let li_ming = DEFAULT_ROSTER.find_by_id(CharacterId(1)).unwrap();
        assert_eq!(li_ming.summary(), "李明 (28岁, 男, 在客厅)");
    }

    #[test]
    fn test_find_by_name_is_case_sensitive_and_exact() {
        let roster = Roster::from_json(
            r#"[{"id": 7, "name": "Anna", "age": 30, "gender": "女", "currentRoom": "厨房"}]"#,
        )
        .unwrap();
        assert!(roster.find_by_name("Anna").is_some());
        assert!(roster.find_by_name("anna").is_none());
        assert!(roster.find_by_name("Ann").is_none());
    }

    #[test]
    fn test_from_json_uses_camel_case_fields() {
        let roster = Roster::from_json(
            r#"[{
                "id": 1,
                "name": "李明",
                "age": 28,
                "gender": "男",
                "personality": "内向",
                "skills": ["编程"],
                "relationships": {"张伟": "室友"},
                "shortTermMemory": ["看电视"],
                "longTermMemory": ["养过猫"],
                "currentRoom": "客厅",
                "color": "red"
            }]"#,
        )
        .unwrap();
        let c = roster.find_by_id(CharacterId(1)).unwrap();
        assert_eq!(c.short_term_memory, vec!["看电视"]);
        assert_eq!(c.long_term_memory, vec!["养过猫"]);
        assert_eq!(c.relationships.get("张伟").map(String::as_str), Some("室友"));
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let roster = Roster::from_json(
            r#"[{"id": 2, "name": "X", "age": 1, "gender": "男", "currentRoom": "阳台"}]"#,
        )
        .unwrap();
        let c = roster.get(0).unwrap();
        assert!(c.skills.is_empty());
        assert_eq!(c.color, "gray");
    }

    #[test]
    fn test_rejects_empty_and_duplicate_rosters() {
        assert!(matches!(Roster::from_json("[]"), Err(RosterError::Empty)));

        let dup = r#"[
            {"id": 1, "name": "A", "age": 1, "gender": "男", "currentRoom": "客厅"},
            {"id": 1, "name": "B", "age": 2, "gender": "女", "currentRoom": "厨房"}
        ]"#;
        assert!(matches!(
            Roster::from_json(dup),
            Err(RosterError::DuplicateId(1))
        ));
    }

    #[test]
    fn test_builders_share_duplicate_check() {
        let built = Roster::new(vec![
            Character::new(7, "甲", 20, "男", "客厅"),
            Character::new(7, "乙", 21, "女", "厨房").with_color("blue"),
        ]);
        assert!(matches!(built, Err(RosterError::DuplicateId(7))));

        let sample = crate::testing::sample_roster().unwrap();
        assert_eq!(sample.len(), 2);
    }

    #[test]
    fn test_malformed_json_is_reported() {
        assert!(matches!(
            Roster::from_json("{not json"),
            Err(RosterError::Serialization(_))
        ));
    }

    #[test]
    fn test_load_round_trips_through_file() {
        let path = std::env::temp_dir().join(format!("roster-{}.json", uuid::Uuid::new_v4()));
        let json = serde_json::to_string(&*DEFAULT_ROSTER).unwrap();
        std::fs::write(&path, json).unwrap();

        let loaded = Roster::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(&loaded, &*DEFAULT_ROSTER);
    }
}
