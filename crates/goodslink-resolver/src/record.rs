use goodslink_core::goods::{DRAFT_THREAD_ID, STATUS_DRAFT};
use goodslink_core::NewProductRecord;

use crate::normalize::NormalizedMetadata;
use crate::pipeline::PreparedLink;

/// Assembles the draft record for a resolved link. The record is always a
/// draft: no thread yet, status zero.
#[must_use]
pub fn build_record(owner_id: i64, link: &PreparedLink, meta: NormalizedMetadata) -> NewProductRecord {
    NewProductRecord {
        owner_id,
        thread_id: DRAFT_THREAD_ID,
        platform_id: meta.platform_id,
        title: meta.title,
        image_path: meta.image_path,
        price: meta.price,
        goods_type: link.platform.key(),
        status: STATUS_DRAFT,
        ready_content: link.ready_content.clone(),
        detail_content: link.address.clone(),
    }
}

#[cfg(test)]
mod tests {
    use goodslink_core::PlatformKind;
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn record_is_a_draft_carrying_the_link() {
        let link = PreparedLink {
            address: "https://item.m.jd.com/product/1.html".to_string(),
            host: None,
            ready_content: "看看 https://item.m.jd.com/product/1.html".to_string(),
            platform: PlatformKind::JdH5,
        };
        let meta = NormalizedMetadata {
            title: "保温杯".to_string(),
            image_path: "https://img/x.jpg".to_string(),
            price: Decimal::new(990, 2),
            platform_id: "1".to_string(),
        };

        let record = build_record(7, &link, meta);

        assert_eq!(record.owner_id, 7);
        assert_eq!(record.thread_id, 0);
        assert_eq!(record.status, 0);
        assert_eq!(record.goods_type, 6);
        assert_eq!(record.detail_content, link.address);
        assert_eq!(record.ready_content, link.ready_content);
        assert_eq!(record.title, "保温杯");
    }
}
