use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// School days, in timetable order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchoolDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl SchoolDay {
    pub const ALL: [SchoolDay; 5] = [
        SchoolDay::Monday,
        SchoolDay::Tuesday,
        SchoolDay::Wednesday,
        SchoolDay::Thursday,
        SchoolDay::Friday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SchoolDay::Monday => "monday",
            SchoolDay::Tuesday => "tuesday",
            SchoolDay::Wednesday => "wednesday",
            SchoolDay::Thursday => "thursday",
            SchoolDay::Friday => "friday",
        }
    }

    /// Dutch display name used on printed task lists.
    pub fn dutch_name(&self) -> &'static str {
        match self {
            SchoolDay::Monday => "Maandag",
            SchoolDay::Tuesday => "Dinsdag",
            SchoolDay::Wednesday => "Woensdag",
            SchoolDay::Thursday => "Donderdag",
            SchoolDay::Friday => "Vrijdag",
        }
    }

    pub fn weekday(&self) -> Weekday {
        match self {
            SchoolDay::Monday => Weekday::Mon,
            SchoolDay::Tuesday => Weekday::Tue,
            SchoolDay::Wednesday => Weekday::Wed,
            SchoolDay::Thursday => Weekday::Thu,
            SchoolDay::Friday => Weekday::Fri,
        }
    }
}

impl fmt::Display for SchoolDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchoolDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monday" | "mon" | "maandag" | "ma" => Ok(SchoolDay::Monday),
            "tuesday" | "tue" | "dinsdag" | "di" => Ok(SchoolDay::Tuesday),
            "wednesday" | "wed" | "woensdag" | "wo" => Ok(SchoolDay::Wednesday),
            "thursday" | "thu" | "donderdag" | "do" => Ok(SchoolDay::Thursday),
            "friday" | "fri" | "vrijdag" | "vr" => Ok(SchoolDay::Friday),
            other => Err(format!("unknown school day '{other}'")),
        }
    }
}

/// Serializes `NaiveTime` as zero-padded 24h `HH:MM`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn parse(input: &str) -> Result<NaiveTime, chrono::ParseError> {
        NaiveTime::parse_from_str(input.trim(), FORMAT)
    }

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(|err| serde::de::Error::custom(format!("invalid time '{raw}': {err}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub id: String,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub subject: String,
    #[serde(default)]
    pub is_break: bool,
}

impl TimeSlot {
    pub fn lesson(
        id: impl Into<String>,
        start_time: NaiveTime,
        end_time: NaiveTime,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            start_time,
            end_time,
            subject: subject.into(),
            is_break: false,
        }
    }

    pub fn pause(
        id: impl Into<String>,
        start_time: NaiveTime,
        end_time: NaiveTime,
        label: impl Into<String>,
    ) -> Self {
        Self {
            is_break: true,
            ..Self::lesson(id, start_time, end_time, label)
        }
    }

    /// True when the slot lies entirely inside `[start, end]`.
    pub fn within(&self, start: NaiveTime, end: NaiveTime) -> bool {
        self.start_time >= start && self.end_time <= end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DaySchedule {
    #[serde(default)]
    pub slots: Vec<TimeSlot>,
}

/// One week of the recurring timetable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekTemplate {
    days: BTreeMap<SchoolDay, DaySchedule>,
}

impl WeekTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slots(&self, day: SchoolDay) -> &[TimeSlot] {
        self.days
            .get(&day)
            .map(|schedule| schedule.slots.as_slice())
            .unwrap_or(&[])
    }

    pub fn slots_mut(&mut self, day: SchoolDay) -> &mut Vec<TimeSlot> {
        &mut self.days.entry(day).or_default().slots
    }

    pub fn push_slot(&mut self, day: SchoolDay, slot: TimeSlot) {
        self.slots_mut(day).push(slot);
    }

    pub fn remove_slot(&mut self, day: SchoolDay, slot_id: &str) -> bool {
        let slots = self.slots_mut(day);
        let before = slots.len();
        slots.retain(|slot| slot.id != slot_id);
        slots.len() != before
    }

    /// Every slot, Monday to Friday, each day in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (SchoolDay, &TimeSlot)> {
        SchoolDay::ALL
            .into_iter()
            .flat_map(move |day| self.slots(day).iter().map(move |slot| (day, slot)))
    }

    pub fn find_slot(&self, slot_id: &str) -> Option<(SchoolDay, &TimeSlot)> {
        self.iter().find(|(_, slot)| slot.id == slot_id)
    }

    /// Ids of the slots on `day` that fall entirely inside the window.
    pub fn slots_within(&self, day: SchoolDay, start: NaiveTime, end: NaiveTime) -> Vec<String> {
        self.slots(day)
            .iter()
            .filter(|slot| slot.within(start, end))
            .map(|slot| slot.id.clone())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleType {
    #[default]
    Weekly,
    Biweekly,
}

impl FromStr for CycleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" => Ok(CycleType::Weekly),
            "biweekly" => Ok(CycleType::Biweekly),
            other => Err(format!("unknown cycle type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CycleWeek {
    A,
    B,
}

impl fmt::Display for CycleWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleWeek::A => f.write_str("A"),
            CycleWeek::B => f.write_str("B"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleWeeks {
    pub week_a: WeekTemplate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_b: Option<WeekTemplate>,
}

/// The recurring timetable a teacher works from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterSchedule {
    pub id: String,
    pub school_year: String,
    pub cycle_type: CycleType,
    #[serde(default)]
    pub teachers: BTreeMap<SchoolDay, String>,
    pub weeks: CycleWeeks,
}

impl MasterSchedule {
    pub fn new(
        id: impl Into<String>,
        school_year: impl Into<String>,
        cycle_type: CycleType,
        week_a: WeekTemplate,
    ) -> Self {
        Self {
            id: id.into(),
            school_year: school_year.into(),
            cycle_type,
            teachers: BTreeMap::new(),
            weeks: CycleWeeks {
                week_a,
                week_b: None,
            },
        }
    }

    /// Weekly timetables always use week A; biweekly ones alternate, odd weeks being A.
    pub fn cycle_week_for(&self, week_number: u32) -> CycleWeek {
        match self.cycle_type {
            CycleType::Weekly => CycleWeek::A,
            CycleType::Biweekly if week_number % 2 == 1 => CycleWeek::A,
            CycleType::Biweekly => CycleWeek::B,
        }
    }

    /// Week B falls back to week A when it was never filled in.
    pub fn template_for(&self, cycle_week: CycleWeek) -> &WeekTemplate {
        match cycle_week {
            CycleWeek::A => &self.weeks.week_a,
            CycleWeek::B => self.weeks.week_b.as_ref().unwrap_or(&self.weeks.week_a),
        }
    }

    pub fn template_mut(&mut self, cycle_week: CycleWeek) -> &mut WeekTemplate {
        match cycle_week {
            CycleWeek::A => &mut self.weeks.week_a,
            CycleWeek::B => {
                let week_a = &self.weeks.week_a;
                self.weeks.week_b.get_or_insert_with(|| week_a.clone())
            }
        }
    }

    pub fn copy_week_a_to_b(&mut self) {
        self.weeks.week_b = Some(self.weeks.week_a.clone());
    }

    pub fn teacher_for(&self, day: SchoolDay) -> Option<&str> {
        self.teachers
            .get(&day)
            .map(String::as_str)
            .filter(|name| !name.trim().is_empty())
    }

    pub fn find_slot(&self, cycle_week: CycleWeek, slot_id: &str) -> Option<(SchoolDay, &TimeSlot)> {
        self.template_for(cycle_week).find_slot(slot_id)
    }

    /// Sort key for a lesson within its day: resolved slots by start time,
    /// then lessons whose slot has left the timetable.
    pub fn slot_order(&self, cycle_week: CycleWeek, slot_id: &str) -> (u8, NaiveTime) {
        self.find_slot(cycle_week, slot_id)
            .map(|(_, slot)| (0, slot.start_time))
            .unwrap_or((1, NaiveTime::MIN))
    }

    /// Distinct lesson subjects in template order (week A first, then week B).
    pub fn subjects(&self) -> Vec<String> {
        let mut subjects: Vec<String> = Vec::new();
        let week_b = self.weeks.week_b.iter().flat_map(|week| week.iter());
        for (_, slot) in self.weeks.week_a.iter().chain(week_b) {
            if !slot.is_break && !subjects.contains(&slot.subject) {
                subjects.push(slot.subject.clone());
            }
        }
        subjects
    }

    /// The standard Dutch "continurooster": 08:30 to 14:15 with a morning
    /// break and a lunch break, gym on Wednesday and creative subjects on Friday.
    pub fn default_for_year(school_year: impl Into<String>) -> Self {
        let mut week = WeekTemplate::new();
        for day in SchoolDay::ALL {
            let afternoon: &[(&str, &str, &str)] = match day {
                SchoolDay::Wednesday => &[
                    ("12:30", "13:30", "Gym"),
                    ("13:30", "14:00", "Wereldoriëntatie"),
                ],
                SchoolDay::Friday => &[
                    ("12:30", "13:15", "Beeldende vorming"),
                    ("13:15", "14:00", "Muziek"),
                ],
                _ => &[
                    ("12:30", "13:15", "Begrijpend lezen"),
                    ("13:15", "14:00", "Wereldoriëntatie"),
                ],
            };
            let morning: [(&str, &str, &str, bool); 8] = [
                ("08:30", "09:00", "Weekopening", false),
                ("09:00", "10:00", "Rekenen", false),
                ("10:00", "10:15", "Pauze", true),
                ("10:15", "11:00", "Taal", false),
                ("11:00", "11:30", "Spelling", false),
                ("11:30", "12:00", "Technisch lezen", false),
                ("12:00", "12:15", "Eten", true),
                ("12:15", "12:30", "Pauze", true),
            ];
            let rows = morning
                .iter()
                .copied()
                .chain(afternoon.iter().map(|&(s, e, subject)| (s, e, subject, false)))
                .chain(std::iter::once(("14:00", "14:15", "Weeksluiting", false)));
            for (start, end, subject, is_break) in rows {
                week.push_slot(
                    day,
                    TimeSlot {
                        id: Uuid::new_v4().to_string(),
                        start_time: clock(start),
                        end_time: clock(end),
                        subject: subject.to_string(),
                        is_break,
                    },
                );
            }
        }

        let mut schedule = Self::new(
            Uuid::new_v4().to_string(),
            school_year,
            CycleType::Weekly,
            week,
        );
        for day in SchoolDay::ALL {
            schedule.teachers.insert(day, String::new());
        }
        schedule
    }
}

fn clock(value: &str) -> NaiveTime {
    hhmm::parse(value).unwrap_or(NaiveTime::MIN)
}
