// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A45 national forest sub-compartment schema
//!
//! The source files carry coded property keys in a fixed field order. The
//! labels below are applied positionally, so they must follow that order
//! exactly; only the count is checked.

/// Source labels in field order, geometry last
pub const JAPANESE_LABELS: [&str; 34] = [
    "小班ID",
    "森林管理局",
    "森林管理署",
    "林班主番",
    "林班枝番",
    "小班主番",
    "小班枝番",
    "局名称",
    "署名称",
    "小班名称",
    "林小班名称",
    "材積",
    "国有林名称",
    "県市町村名称",
    "樹種1",
    "樹立林齢1",
    "最新林齢1",
    "樹種2",
    "樹立林齢2",
    "最新林齢2",
    "樹種3",
    "樹立林齢3",
    "最新林齢3",
    "計画区名称",
    "林種の細分",
    "機能類型",
    "面積",
    "保安林１",
    "保安林２",
    "保安林３",
    "保安林４",
    "保護林",
    "緑の回廊",
    "geometry",
];

/// Columns with no use after loading
pub const JAPANESE_DROP: [&str; 17] = [
    "小班ID",
    "森林管理局",
    "森林管理署",
    "局名称",
    "署名称",
    "林班枝番",
    "小班名称",
    "林小班名称",
    "最新林齢1",
    "最新林齢2",
    "最新林齢3",
    "保安林１",
    "保安林２",
    "保安林３",
    "保安林４",
    "保護林",
    "緑の回廊",
];

/// English translations of [`JAPANESE_LABELS`], same order
pub const ENGLISH_LABELS: [&str; 34] = [
    "Sub-compartment ID",
    "Forest Management Bureau",
    "Forest Management Office",
    "Main Forest Compartment Number",
    "Sub Forest Compartment Number",
    "Main Sub-compartment Number",
    "Sub-compartment Branch Number",
    "Bureau Name",
    "Office Name",
    "Sub-compartment Name",
    "Forest Sub-compartment Name",
    "Timber Volume",
    "National Forest Name",
    "Prefecture/City/Town Name",
    "Tree Species 1",
    "Established Forest Age 1",
    "Latest Forest Age 1",
    "Tree Species 2",
    "Established Forest Age 2",
    "Latest Forest Age 2",
    "Tree Species 3",
    "Established Forest Age 3",
    "Latest Forest Age 3",
    "Planning Area Name",
    "Subdivision of Forest Type",
    "Functional Type",
    "Area",
    "Protection Forest 1",
    "Protection Forest 2",
    "Protection Forest 3",
    "Protection Forest 4",
    "Conservation Forest",
    "Green Corridor",
    "geometry",
];

/// English counterpart of [`JAPANESE_DROP`]
pub const ENGLISH_DROP: [&str; 17] = [
    "Sub-compartment ID",
    "Forest Management Bureau",
    "Forest Management Office",
    "Bureau Name",
    "Office Name",
    "Sub Forest Compartment Number",
    "Sub-compartment Name",
    "Forest Sub-compartment Name",
    "Latest Forest Age 1",
    "Latest Forest Age 2",
    "Latest Forest Age 3",
    "Protection Forest 1",
    "Protection Forest 2",
    "Protection Forest 3",
    "Protection Forest 4",
    "Conservation Forest",
    "Green Corridor",
];

/// Label set plus the names the pipeline addresses directly
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnSet {
    pub labels: Vec<String>,
    pub drop: Vec<String>,
    /// Raw timber volume
    pub volume: String,
    /// Parcel area
    pub area: String,
    /// Derived volume density, appended last
    pub density: String,
    pub planning_area: String,
    pub municipality: String,
}

impl ColumnSet {
    /// Labels as published by the data provider
    pub fn japanese() -> Self {
        Self {
            labels: to_owned(&JAPANESE_LABELS),
            drop: to_owned(&JAPANESE_DROP),
            volume: "材積".into(),
            area: "面積".into(),
            density: "材積/ha".into(),
            planning_area: "計画区名称".into(),
            municipality: "県市町村名称".into(),
        }
    }

    /// Translated labels
    pub fn english() -> Self {
        Self {
            labels: to_owned(&ENGLISH_LABELS),
            drop: to_owned(&ENGLISH_DROP),
            volume: "Timber Volume".into(),
            area: "Area".into(),
            density: "Timber Volume/ha".into(),
            planning_area: "Planning Area Name".into(),
            municipality: "Prefecture/City/Town Name".into(),
        }
    }

    /// Look up a label set by name (`japanese`, `english`)
    pub fn by_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "japanese" | "ja" => Some(Self::japanese()),
            "english" | "en" => Some(Self::english()),
            _ => None,
        }
    }
}

impl Default for ColumnSet {
    fn default() -> Self {
        Self::japanese()
    }
}

fn to_owned(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|s| s.to_string()).collect()
}
