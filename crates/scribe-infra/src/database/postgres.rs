//! PostgreSQL store implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, JoinType, LoaderTrait, ModelTrait,
    NotSet, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set,
};
use uuid::Uuid;

use scribe_core::domain::{Category, CategoryWithCount, Post, PostDetail, Tag, TagWithCount};
use scribe_core::error::StoreError;
use scribe_core::filter::PostQuery;
use scribe_core::ports::{
    CategoryChanges, CategoryStore, NewCategory, NewTag, PostChanges, PostStore, TagChanges,
    TagStore,
};

use super::entity::{category, post, post_tag, tag};

/// PostgreSQL post store.
pub struct PostgresPostStore {
    db: DbConn,
}

/// PostgreSQL category store.
pub struct PostgresCategoryStore {
    db: DbConn,
}

/// PostgreSQL tag store.
pub struct PostgresTagStore {
    db: DbConn,
}

impl PostgresPostStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    async fn hydrate(&self, model: post::Model) -> Result<PostDetail, StoreError> {
        let category = model
            .find_related(category::Entity)
            .one(&self.db)
            .await
            .map_err(map_err)?
            .ok_or_else(|| StoreError::Query("post references a missing category".to_string()))?;
        let tags = model
            .find_related(tag::Entity)
            .all(&self.db)
            .await
            .map_err(map_err)?;

        Ok(PostDetail {
            post: model.into(),
            category: category.into(),
            tags: tags.into_iter().map(Into::into).collect(),
        })
    }
}

impl PostgresCategoryStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

impl PostgresTagStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostStore for PostgresPostStore {
    async fn count(&self, query: &PostQuery) -> Result<u64, StoreError> {
        apply_query(post::Entity::find(), query)
            .count(&self.db)
            .await
            .map_err(map_err)
    }

    async fn find_page(
        &self,
        query: &PostQuery,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PostDetail>, StoreError> {
        let rows = apply_query(post::Entity::find(), query)
            .order_by_desc(post::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_err)?;

        let categories = rows
            .load_one(category::Entity, &self.db)
            .await
            .map_err(map_err)?;
        let tags = rows
            .load_many_to_many(tag::Entity, post_tag::Entity, &self.db)
            .await
            .map_err(map_err)?;

        rows.into_iter()
            .zip(categories)
            .zip(tags)
            .map(|((row, category), row_tags)| {
                let category = category.ok_or_else(|| {
                    StoreError::Query("post references a missing category".to_string())
                })?;
                Ok(PostDetail {
                    post: row.into(),
                    category: category.into(),
                    tags: row_tags.into_iter().map(Into::into).collect(),
                })
            })
            .collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostDetail>, StoreError> {
        let Some(model) = post::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_err)?
        else {
            return Ok(None);
        };
        self.hydrate(model).await.map(Some)
    }

    async fn title_exists(&self, title: &str, exclude: Option<Uuid>) -> Result<bool, StoreError> {
        let mut select = post::Entity::find().filter(post::Column::Title.eq(title));
        if let Some(id) = exclude {
            select = select.filter(post::Column::Id.ne(id));
        }
        let matches = select.count(&self.db).await.map_err(map_err)?;
        Ok(matches > 0)
    }

    async fn insert(&self, post: Post, tag_ids: &[i32]) -> Result<PostDetail, StoreError> {
        let active: post::ActiveModel = post.into();
        let model = active.insert(&self.db).await.map_err(map_err)?;

        if !tag_ids.is_empty() {
            self.connect_tags(model.id, tag_ids).await?;
        }

        self.hydrate(model).await
    }

    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<PostDetail, StoreError> {
        let mut active = post::ActiveModel {
            id: Set(id),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(slug) = changes.slug {
            active.slug = Set(slug);
        }
        if let Some(content) = changes.content {
            active.content = Set(content);
        }
        if let Some(read_time) = changes.read_time {
            active.read_time = Set(read_time);
        }
        if let Some(excerpt) = changes.excerpt {
            active.excerpt = Set(excerpt);
        }
        if let Some(category_id) = changes.category_id {
            active.category_id = Set(category_id);
        }

        let model = active.update(&self.db).await.map_err(map_err)?;
        self.hydrate(model).await
    }

    async fn clear_tags(&self, id: Uuid) -> Result<(), StoreError> {
        post_tag::Entity::delete_many()
            .filter(post_tag::Column::PostId.eq(id))
            .exec(&self.db)
            .await
            .map_err(map_err)?;
        Ok(())
    }

    async fn connect_tags(&self, id: Uuid, tag_ids: &[i32]) -> Result<(), StoreError> {
        if tag_ids.is_empty() {
            return Ok(());
        }
        let rows = tag_ids.iter().map(|tag_id| post_tag::ActiveModel {
            post_id: Set(id),
            tag_id: Set(*tag_id),
        });
        post_tag::Entity::insert_many(rows)
            .exec(&self.db)
            .await
            .map_err(map_err)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = post::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_err)?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl CategoryStore for PostgresCategoryStore {
    async fn find_all(&self) -> Result<Vec<CategoryWithCount>, StoreError> {
        let categories = category::Entity::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_err)?;

        let counts: Vec<(i32, i64)> = post::Entity::find()
            .select_only()
            .column(post::Column::CategoryId)
            .column_as(post::Column::Id.count(), "post_count")
            .group_by(post::Column::CategoryId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(map_err)?;
        let by_category: HashMap<i32, u64> = counts
            .into_iter()
            .map(|(id, count)| (id, count as u64))
            .collect();

        Ok(categories
            .into_iter()
            .map(|model| {
                let post_count = by_category.get(&model.id).copied().unwrap_or(0);
                CategoryWithCount {
                    category: model.into(),
                    post_count,
                }
            })
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<CategoryWithCount>, StoreError> {
        let Some(model) = category::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_err)?
        else {
            return Ok(None);
        };
        let post_count = post::Entity::find()
            .filter(post::Column::CategoryId.eq(id))
            .count(&self.db)
            .await
            .map_err(map_err)?;

        Ok(Some(CategoryWithCount {
            category: model.into(),
            post_count,
        }))
    }

    async fn name_exists(&self, name: &str, exclude: Option<i32>) -> Result<bool, StoreError> {
        let mut select = category::Entity::find().filter(category::Column::Name.eq(name));
        if let Some(id) = exclude {
            select = select.filter(category::Column::Id.ne(id));
        }
        let matches = select.count(&self.db).await.map_err(map_err)?;
        Ok(matches > 0)
    }

    async fn insert(&self, new: NewCategory) -> Result<Category, StoreError> {
        let now = Utc::now();
        let model = category::ActiveModel {
            id: NotSet,
            name: Set(new.name),
            description: Set(new.description),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&self.db)
        .await
        .map_err(map_err)?;
        Ok(model.into())
    }

    async fn update(&self, id: i32, changes: CategoryChanges) -> Result<Category, StoreError> {
        let mut active = category::ActiveModel {
            id: Set(id),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }

        let model = active.update(&self.db).await.map_err(map_err)?;
        Ok(model.into())
    }

    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        let result = category::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_err)?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl TagStore for PostgresTagStore {
    async fn find_all(&self) -> Result<Vec<TagWithCount>, StoreError> {
        let tags = tag::Entity::find()
            .order_by_asc(tag::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_err)?;

        let counts: Vec<(i32, i64)> = post_tag::Entity::find()
            .select_only()
            .column(post_tag::Column::TagId)
            .column_as(post_tag::Column::PostId.count(), "post_count")
            .group_by(post_tag::Column::TagId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(map_err)?;
        let by_tag: HashMap<i32, u64> = counts
            .into_iter()
            .map(|(id, count)| (id, count as u64))
            .collect();

        Ok(tags
            .into_iter()
            .map(|model| {
                let post_count = by_tag.get(&model.id).copied().unwrap_or(0);
                TagWithCount {
                    tag: model.into(),
                    post_count,
                }
            })
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<TagWithCount>, StoreError> {
        let Some(model) = tag::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_err)?
        else {
            return Ok(None);
        };
        let post_count = post_tag::Entity::find()
            .filter(post_tag::Column::TagId.eq(id))
            .count(&self.db)
            .await
            .map_err(map_err)?;

        Ok(Some(TagWithCount {
            tag: model.into(),
            post_count,
        }))
    }

    async fn name_exists(&self, name: &str, exclude: Option<i32>) -> Result<bool, StoreError> {
        let mut select = tag::Entity::find().filter(tag::Column::Name.eq(name));
        if let Some(id) = exclude {
            select = select.filter(tag::Column::Id.ne(id));
        }
        let matches = select.count(&self.db).await.map_err(map_err)?;
        Ok(matches > 0)
    }

    async fn insert(&self, new: NewTag) -> Result<Tag, StoreError> {
        let now = Utc::now();
        let model = tag::ActiveModel {
            id: NotSet,
            name: Set(new.name),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&self.db)
        .await
        .map_err(map_err)?;
        Ok(model.into())
    }

    async fn update(&self, id: i32, changes: TagChanges) -> Result<Tag, StoreError> {
        let mut active = tag::ActiveModel {
            id: Set(id),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };
        if let Some(name) = changes.name {
            active.name = Set(name);
        }

        let model = active.update(&self.db).await.map_err(map_err)?;
        Ok(model.into())
    }

    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        let result = tag::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_err)?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

/// Translate the compiled predicate into query clauses. Clauses are
/// independent and AND-combined, matching the predicate contract.
fn apply_query(mut select: Select<post::Entity>, query: &PostQuery) -> Select<post::Entity> {
    if let Some(needle) = &query.title_contains {
        select = select.filter(
            Expr::col(post::Column::Title).ilike(format!("%{}%", escape_like(needle))),
        );
    }
    if let Some((start, end)) = query.created_within {
        select = select
            .filter(post::Column::CreatedAt.gte(start))
            .filter(post::Column::CreatedAt.lt(end));
    }
    if let Some(category_id) = query.category_id {
        select = select.filter(post::Column::CategoryId.eq(category_id));
    }
    if let Some(tag_id) = query.tag_id {
        select = select
            .join(JoinType::InnerJoin, post::Relation::PostTags.def())
            .filter(post_tag::Column::TagId.eq(tag_id));
    }
    select
}

fn escape_like(needle: &str) -> String {
    needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn map_err(err: DbErr) -> StoreError {
    match err {
        DbErr::RecordNotUpdated => StoreError::NotFound,
        DbErr::Conn(e) => StoreError::Connection(e.to_string()),
        other => {
            let msg = other.to_string();
            if msg.contains("duplicate") || msg.contains("unique") || msg.contains("foreign key") {
                StoreError::Constraint(msg)
            } else {
                StoreError::Query(msg)
            }
        }
    }
}
