// Fixed CSV layouts, one per explorer category.

use serde_json::Value;

use crate::ops::show;
use crate::size::format_size_value;

/// One CSV column and where its value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    /// `item[key]`
    Field(&'static str),
    /// `item[key]` rendered with `format_size`, header `"<key> (Human)"`.
    Human(&'static str),
    /// `item.source[key]`, header `"src_<key>"`.
    Source(&'static str),
    /// `item.usage[key]`, header `"usage_<key>"`.
    Usage(&'static str),
    /// `item.usage[key]` as a size, header `"usage_<key> (Human)"`.
    UsageHuman(&'static str),
}

impl Column {
    pub fn header(self) -> String {
        match self {
            Self::Field(key) => key.to_owned(),
            Self::Human(key) => format!("{key} (Human)"),
            Self::Source(key) => format!("src_{key}"),
            Self::Usage(key) => format!("usage_{key}"),
            Self::UsageHuman(key) => format!("usage_{key} (Human)"),
        }
    }

    pub fn value(self, item: &Value) -> String {
        match self {
            Self::Field(key) => show(item.get(key)),
            Self::Human(key) => format_size_value(item.get(key)),
            Self::Source(key) => show(item.get("source").and_then(|s| s.get(key))),
            Self::Usage(key) => show(item.get("usage").and_then(|u| u.get(key))),
            Self::UsageHuman(key) => {
                format_size_value(item.get("usage").and_then(|u| u.get(key)))
            }
        }
    }

    /// Columns blanked out for exported pools.
    pub fn is_usage(self) -> bool {
        matches!(self, Self::Usage(_) | Self::UsageHuman(_))
    }
}

use Column::{Field as F, Human as H, Source as S, Usage as U, UsageHuman as UH};

/// How the response body is shaped under its root key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A single object, written as one data row.
    Object,
    /// An array of objects, one data row each.
    List,
}

#[derive(Debug, Clone, Copy)]
pub struct Schema {
    /// Key of the payload in the response body.
    pub root: &'static str,
    pub shape: Shape,
    pub columns: &'static [Column],
}

pub const VERSION: &[Column] = &[
    F("href"), F("nodename"), F("mkt_product"), F("product"), F("version"),
    F("install_time"), F("update_time"), F("boot_time"), F("asn"), F("csn"),
    F("part"), F("urn"), F("navname"), F("navagent"), F("http"), F("ssl"),
    F("ak_version"), F("os_version"), F("bios_version"), F("sp_version"),
];

pub const CLUSTER: &[Column] = &[
    F("state"), F("description"), F("peer_asn"), F("peer_hostname"),
    F("peer_state"), F("peer_description"),
];

/// Second table of the cluster file, one row per `resources` entry.
pub const CLUSTER_RESOURCES: &[Column] =
    &[F("owner"), F("type"), F("user_label"), F("details"), F("href")];

pub const PROBLEMS: &[Column] = &[
    F("uuid"), F("code"), F("diagnosed"), F("phoned_home"), F("severity"),
    F("type"), F("url"), F("description"), F("impact"), F("response"),
    F("action"), F("href"),
];

pub const DATALINKS: &[Column] = &[
    F("class"), F("label"), F("mac"), F("links"), F("pkey"), F("linkmode"),
    F("mtu"), F("id"), F("speed"), F("duplex"), F("datalink"), F("href"),
];

pub const DEVICES: &[Column] = &[
    F("speed"), F("up"), F("active"), F("media"), F("factory_mac"), F("port"),
    F("guid"), F("duplex"), F("device"), F("href"),
];

pub const INTERFACES: &[Column] = &[
    F("state"), F("curaddrs"), F("class"), F("label"), F("enable"), F("admin"),
    F("links"), F("v4addrs"), F("v4dhcp"), F("v4directnets"), F("v6addrs"),
    F("v6dhcp"), F("v6directnets"), F("key"), F("standbys"), F("interface"),
    F("href"),
];

pub const ROUTES: &[Column] = &[
    F("status"), F("family"), F("destination"), F("mask"), F("href"),
    F("interface"), F("type"), F("gateway"),
];

pub const ROUTING: &[Column] = &[F("href"), F("multihoming")];

pub const POOLS: &[Column] = &[
    F("status"), F("profile"), F("name"),
    U("available"), UH("available"),
    U("usage_snapshots"), UH("usage_snapshots"),
    U("used"), UH("used"),
    U("compression"),
    U("usage_data"), UH("usage_data"),
    U("free"), UH("free"),
    U("dedupratio"),
    U("total"), UH("total"),
    U("usage_total"), UH("usage_total"),
    F("peer"), F("href"), F("owner"), F("asn"),
];

/// Source columns shared by projects and filesystems.
const SHARE_SOURCES: [Column; 28] = [
    S("snapdir"), S("logbias"), S("dedup"), S("sharenfs"), S("sharesmb"),
    S("mountpoint"), S("rrsrc_actions"), S("compression"), S("sharetftp"),
    S("encryption"), S("sharedav"), S("copies"), S("aclinherit"),
    S("shareftp"), S("readonly"), S("keychangedate"), S("secondarycache"),
    S("maxblocksize"), S("exported"), S("vscan"), S("reservation"),
    S("atime"), S("recordsize"), S("checksum"), S("sharesftp"),
    S("nbmand"), S("aclmode"), S("rstchown"),
];

pub const PROJECTS: &[Column] = &concat_columns::<PROJECTS_LEN>(&[
    &[
        F("snapdir"), F("default_volblocksize"), F("defaultgroupquota"),
        F("logbias"), F("creation"), F("nodestroy"), F("dedup"), F("sharenfs"),
        F("href"), F("sharesmb"), F("default_permissions"), F("mountpoint"),
        F("snaplabel"), F("id"), F("readonly"), F("space_data"), H("space_data"),
        F("compression"), F("defaultuserquota"),
    ],
    &SHARE_SOURCES,
    &[
        F("default_sparse"), F("encryption"), F("aclmode"), F("copies"),
        F("aclinherit"), F("compressratio"), F("shareftp"), F("canonical_name"),
        F("recordsize"), H("recordsize"), F("keychangedate"),
        F("space_available"), H("space_available"), F("secondarycache"),
        F("name"), F("space_snapshots"), H("space_snapshots"),
        F("space_unused_res"), H("space_unused_res"), F("quota"), H("quota"),
        F("maxblocksize"), H("maxblocksize"), F("exported"),
        F("default_volsize"), H("default_volsize"), F("vscan"),
        F("reservation"), H("reservation"), F("keystatus"), F("atime"),
        F("pool"), F("default_user"), F("space_unused_res_shares"),
        H("space_unused_res_shares"), F("sharetftp"), F("checksum"),
        F("space_total"), H("space_total"), F("default_group"), F("sharesftp"),
        F("rstchown"), F("sharedav"), F("nbmand"),
    ],
]);
const PROJECTS_LEN: usize = 19 + 28 + 44;

pub const FILESYSTEMS: &[Column] = &concat_columns::<FILESYSTEMS_LEN>(&[
    &[
        F("snapdir"), F("logbias"), F("creation"), F("nodestroy"), F("dedup"),
        F("sharenfs"), F("sharesmb_abe"), F("sharesmb"), F("root_acl"),
        F("mountpoint"), F("casesensitivity"), F("snaplabel"), F("id"),
        F("readonly"), F("sharesmb_name"), F("space_data"), H("space_data"),
        F("compression"), F("sharetftp"),
    ],
    &SHARE_SOURCES,
    &[
        F("encryption"), F("aclmode"), F("copies"), F("smbshareacl"),
        F("aclinherit"), F("compressratio"), F("shareftp"), F("canonical_name"),
        F("recordsize"), H("recordsize"), F("keychangedate"),
        F("space_available"), H("space_available"), F("root_group"),
        F("secondarycache"), F("root_user"), F("root_permissions"), F("shadow"),
        F("space_snapshots"), H("space_snapshots"), F("href"),
        F("space_unused_res"), H("space_unused_res"), F("quota"), H("quota"),
        F("utf8only"), F("sharesmb_dfsroot"), F("maxblocksize"),
        H("maxblocksize"), F("exported"), F("vscan"), F("reservation"),
        H("reservation"), F("keystatus"), F("atime"), F("pool"),
        F("quota_snap"), H("quota_snap"), F("space_unused_res_shares"),
        F("name"), F("checksum"), F("space_total"), H("space_total"),
        F("project"), F("normalization"), F("sharesftp"), F("rstchown"),
        F("reservation_snap"), H("reservation_snap"), F("sharedav"), F("nbmand"),
    ],
]);
const FILESYSTEMS_LEN: usize = 19 + 28 + 51;

pub const LUNS: &[Column] = &[
    F("logbias"), F("creation"), F("nodestroy"), F("assignednumber"),
    F("copies"), F("href"), F("fixednumber"), F("space_data"), H("space_data"),
    F("id"), F("writecache"), F("compression"), F("encryption"), F("dedup"),
    F("snaplabel"), F("compressratio"),
    S("compression"), S("encryption"), S("logbias"), S("dedup"), S("copies"),
    S("maxblocksize"), S("exported"), S("checksum"), S("keychangedate"),
    S("rrsrc_actions"), S("secondarycache"),
    F("space_total"), H("space_total"), F("lunumber"), F("keychangedate"),
    F("space_available"), H("space_available"), F("secondarycache"),
    F("status"), F("space_snapshots"), H("space_snapshots"), F("lunguid"),
    F("maxblocksize"), H("maxblocksize"), F("exported"), F("initiatorgroup"),
    F("volsize"), H("volsize"), F("keystatus"), F("pool"), F("volblocksize"),
    H("volblocksize"), F("writelimit"), F("name"), F("checksum"),
    F("canonical_name"), F("project"), F("sparse"), F("targetgroup"),
    F("effectivewritelimit"),
];

pub const FC_INITIATORS: &[Column] = &[F("alias"), F("initiator"), F("href")];
pub const INITIATOR_GROUPS: &[Column] = &[F("name"), F("initiators"), F("href")];
pub const FC_TARGETS: &[Column] = &[
    F("wwn"), F("port"), F("mode"), F("speed"), F("discovered_ports"),
    F("link_failure_count"), F("loss_of_sync_count"), F("loss_of_signal_count"),
    F("protocol_error_count"), F("invalid_tx_word_count"),
    F("invalid_crc_count"), F("href"),
];
pub const TARGET_GROUPS: &[Column] = &[F("name"), F("targets"), F("href")];
pub const ISCSI_INITIATORS: &[Column] = &[
    F("alias"), F("initiator"), F("chapuser"), F("chapsecret"), F("href"),
];
pub const ISCSI_TARGETS: &[Column] = &[
    F("alias"), F("iqn"), F("auth"), F("targetchapuser"), F("targetchapsecret"),
    F("interfaces"), F("href"),
];
pub const USERS: &[Column] = &[
    F("logname"), F("type"), F("uid"), F("fullname"), F("initial_password"),
    F("require_annotation"), F("roles"), F("kiosk_mode"), F("kiosk_screen"),
    F("href"),
];

/// Join column groups into one fixed-size array at compile time.
const fn concat_columns<const N: usize>(groups: &[&[Column]]) -> [Column; N] {
    let mut out = [Column::Field(""); N];
    let mut n = 0;
    let mut g = 0;
    while g < groups.len() {
        let group = groups[g];
        let mut i = 0;
        while i < group.len() {
            out[n] = group[i];
            n += 1;
            i += 1;
        }
        g += 1;
    }
    assert!(n == N, "column count mismatch");
    out
}
