//! Static machine-name → label dictionary for live-data fields.

/// Field labels, in the order the live-data export documents them.
pub const FIELD_LABELS: &[(&str, &str)] = &[
    ("timeMinute", "时刻"),
    ("commentCnt", "评论数"),
    ("commentCntRank", "互动高峰"),
    ("commentUcnt", "评论人数"),
    ("costDiamonds", "消耗钻石数"),
    ("consumeUcnt", "送礼人数"),
    ("earnScore", "音浪"),
    ("earnScoreRank", "送礼高峰"),
    ("expectMinute", "预计扶持时长"),
    ("expectWatchCnt", "预计进房数量"),
    ("followUcnt", "关注人数"),
    ("likeCnt", "点赞数"),
    ("likeUcnt", "点赞人数"),
    ("lottery", "抽奖"),
    ("luckymoneyCnt", "福袋钻石数"),
    ("operatorID", "操作员ID"),
    ("operatorName", "操作员名字"),
    ("pcuTotal", "在线人数"),
    ("realMinute", "实际扶持时长"),
    ("realWatchCnt", "实际进房数量"),
    ("watchUcnt", "进入直播间人数"),
    ("watchUcntRank", "在线观众高峰"),
    ("keyEvent", "关键事件"),
    ("c", "主C"),
    ("music", "音乐"),
];

/// Dictionary label for `field`, if it has one.
pub fn lookup(field: &str) -> Option<&'static str> {
    FIELD_LABELS
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, label)| *label)
}

/// Label for `field`, falling back to the field name itself.
pub fn label_for(field: &str) -> &str {
    lookup(field).unwrap_or(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_fields() {
        assert_eq!(label_for("timeMinute"), "时刻");
        assert_eq!(label_for("watchUcnt"), "进入直播间人数");
        assert_eq!(label_for("watchUcntRank"), "在线观众高峰");
    }

    #[test]
    fn test_unknown_field_falls_back_to_name() {
        assert_eq!(lookup("groupPlay"), None);
        assert_eq!(label_for("groupPlay"), "groupPlay");
    }

    #[test]
    fn test_names_are_unique() {
        for (i, (name, _)) in FIELD_LABELS.iter().enumerate() {
            assert!(
                FIELD_LABELS[i + 1..].iter().all(|(other, _)| other != name),
                "duplicate entry for {name}"
            );
        }
    }
}
