use super::s3_bucket::BUCKET;
use crate::block::{nested_block, BlockEdit, NestedBlock, Resource};
use crate::document::Document;
use crate::filter::FilterError;
use crate::list::split_list;
use crate::split::new_split_resource;
use hcl_edit::expr::Expression;

/// Placeholder for the owner of the bucket ACL, the canonical user id is not known statically
const OWNER_ID: &str = "set_aws_canonical_user_id";

/// `grant` blocks become an `access_control_policy` of `aws_s3_bucket_acl`
///
/// A grant with a list of `permissions` turns into one `grant` per permission. Grants whose
/// permissions are not a literal list are left on the bucket.
pub(super) fn grant(document: &mut Document, resource: &mut Resource) -> Result<(), FilterError> {
    let splittable: Vec<usize> = resource
        .find_nested_blocks_by_type("grant")
        .into_iter()
        .enumerate()
        .filter(|(_, grant)| permissions(grant).is_some())
        .map(|(position, _)| position)
        .collect();

    if splittable.is_empty() {
        tracing::trace!("no splittable grant found");
        return Ok(());
    }

    let mut acl = new_split_resource(resource, "aws_s3_bucket_acl", BUCKET)?;

    // back to front so the positions of the remaining grants stay valid
    let mut grants: Vec<NestedBlock> = splittable
        .into_iter()
        .rev()
        .filter_map(|position| resource.remove_nested_block("grant", position))
        .collect();
    grants.reverse();

    let mut policy = nested_block("access_control_policy");
    for mut grant in grants {
        let Some(permissions) = permissions(&grant) else {
            continue;
        };
        grant.remove_attribute("permissions");

        for permission in permissions {
            let mut grantee = nested_block("grantee");
            grantee.append_unwrapped_nested_block_body(grant.clone());

            let mut split = nested_block("grant");
            split.append_nested_block(grantee);
            split.set_attribute_raw("permission", permission);
            policy.append_nested_block(split);
        }
    }

    let mut owner = nested_block("owner");
    owner.set_attribute_value("id", OWNER_ID);
    policy.append_nested_block(owner);

    acl.append_nested_block(policy);
    document.append_block(acl);
    Ok(())
}

fn permissions(grant: &NestedBlock) -> Option<Vec<Expression>> {
    split_list(&grant.get_attribute("permissions")?.value)
}
