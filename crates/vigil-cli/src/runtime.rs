// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use std::sync::mpsc::Sender;
use std::thread;
use vigil_api::{ApiError, Client};
use vigil_app::{
    Category, CategoryFormInput, CategoryId, ContentId, ContentItem, ContentPage, ListQuery,
    LoginFormInput, Session, Stats,
};
use vigil_tui::{AppRuntime, FetchError, InternalEvent};

fn fetch_error(error: ApiError) -> FetchError {
    if error.is_not_found() {
        FetchError::NotFound(error.user_message())
    } else if error.is_unauthorized() {
        FetchError::Unauthorized(error.user_message())
    } else {
        FetchError::Other(error.user_message())
    }
}

/// Live runtime over the dashboard HTTP API. Slow collection calls are
/// pushed onto worker threads; the cookie store inside the cloned client
/// is shared, so the session follows.
pub struct ApiRuntime {
    client: Client,
    page_size: i64,
}

impl ApiRuntime {
    pub fn new(client: Client, page_size: i64) -> Self {
        Self { client, page_size }
    }
}

impl AppRuntime for ApiRuntime {
    fn login(&mut self, form: &LoginFormInput) -> Result<Session, FetchError> {
        self.client
            .login(&form.username, &form.password)
            .map_err(fetch_error)
    }

    fn current_session(&mut self) -> Result<Session, FetchError> {
        self.client.session().map_err(fetch_error)
    }

    fn logout(&mut self) -> Result<(), FetchError> {
        self.client.logout().map_err(fetch_error)
    }

    fn list_categories(&mut self) -> Result<Vec<Category>, FetchError> {
        self.client.list_categories().map_err(fetch_error)
    }

    fn create_category(&mut self, form: &CategoryFormInput) -> Result<Category, FetchError> {
        self.client.create_category(form).map_err(fetch_error)
    }

    fn update_category(
        &mut self,
        id: &CategoryId,
        form: &CategoryFormInput,
    ) -> Result<Category, FetchError> {
        self.client.update_category(id, form).map_err(fetch_error)
    }

    fn delete_category(&mut self, id: &CategoryId) -> Result<(), FetchError> {
        self.client.delete_category(id).map_err(fetch_error)
    }

    fn fetch_page(&mut self, query: &ListQuery) -> Result<ContentPage, FetchError> {
        self.client.list_contents(query).map_err(fetch_error)
    }

    fn fetch_content(&mut self, id: &ContentId) -> Result<ContentItem, FetchError> {
        self.client.get_content(id).map_err(fetch_error)
    }

    fn fetch_stats(&mut self) -> Result<Stats, FetchError> {
        self.client.stats().map_err(fetch_error)
    }

    fn page_size(&mut self) -> i64 {
        self.page_size
    }

    fn spawn_page_fetch(
        &mut self,
        seq: u64,
        query: &ListQuery,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let client = self.client.clone();
        let query = query.clone();
        thread::spawn(move || {
            let result = client.list_contents(&query).map_err(fetch_error);
            let _ = tx.send(InternalEvent::PageLoaded { seq, result });
        });
        Ok(())
    }

    fn spawn_detail_fetch(
        &mut self,
        seq: u64,
        id: &ContentId,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let client = self.client.clone();
        let id = id.clone();
        thread::spawn(move || {
            let result = client.get_content(&id).map_err(fetch_error);
            let _ = tx.send(InternalEvent::DetailLoaded { seq, result });
        });
        Ok(())
    }

    fn spawn_stats_fetch(&mut self, seq: u64, tx: Sender<InternalEvent>) -> Result<()> {
        let client = self.client.clone();
        thread::spawn(move || {
            let result = client.stats().map_err(fetch_error);
            let _ = tx.send(InternalEvent::StatsLoaded { seq, result });
        });
        Ok(())
    }
}

/// Offline runtime for `--demo`: a deterministic dataset served from
/// memory, with category CRUD mutating the local collection the same way
/// the backend would.
pub struct DemoRuntime {
    session: Option<Session>,
    categories: Vec<Category>,
    items: Vec<ContentItem>,
    next_category: usize,
}

impl DemoRuntime {
    pub fn seeded() -> Self {
        let categories = vigil_testkit::sample_categories();
        Self {
            session: Some(vigil_testkit::demo_session()),
            next_category: categories.len() + 1,
            categories,
            items: vigil_testkit::sample_items(120),
        }
    }
}

impl AppRuntime for DemoRuntime {
    fn login(&mut self, _form: &LoginFormInput) -> Result<Session, FetchError> {
        let session = vigil_testkit::demo_session();
        self.session = Some(session.clone());
        Ok(session)
    }

    fn current_session(&mut self) -> Result<Session, FetchError> {
        self.session
            .clone()
            .ok_or_else(|| FetchError::Unauthorized("Not authenticated".to_owned()))
    }

    fn logout(&mut self) -> Result<(), FetchError> {
        self.session = None;
        Ok(())
    }

    fn list_categories(&mut self) -> Result<Vec<Category>, FetchError> {
        Ok(self.categories.clone())
    }

    fn create_category(&mut self, form: &CategoryFormInput) -> Result<Category, FetchError> {
        if self
            .categories
            .iter()
            .any(|category| category.name == form.name)
        {
            return Err(FetchError::Other(format!(
                "category {:?} already exists",
                form.name
            )));
        }

        let category = Category {
            id: CategoryId::new(format!("cat-{}", self.next_category)),
            name: form.name.clone(),
            description: form.description.clone(),
            default_criticality: form.default_criticality,
            color: form.color.clone(),
            created_at: None,
            updated_at: None,
        };
        self.next_category += 1;
        self.categories.push(category.clone());
        Ok(category)
    }

    fn update_category(
        &mut self,
        id: &CategoryId,
        form: &CategoryFormInput,
    ) -> Result<Category, FetchError> {
        let Some(category) = self
            .categories
            .iter_mut()
            .find(|category| &category.id == id)
        else {
            return Err(FetchError::NotFound("Category not found".to_owned()));
        };

        category.name = form.name.clone();
        category.description = form.description.clone();
        category.default_criticality = form.default_criticality;
        category.color = form.color.clone();
        Ok(category.clone())
    }

    fn delete_category(&mut self, id: &CategoryId) -> Result<(), FetchError> {
        let before = self.categories.len();
        self.categories.retain(|category| &category.id != id);
        if self.categories.len() == before {
            return Err(FetchError::NotFound("Category not found".to_owned()));
        }

        for item in &mut self.items {
            item.categories.retain(|category| &category.id != id);
        }
        Ok(())
    }

    fn fetch_page(&mut self, query: &ListQuery) -> Result<ContentPage, FetchError> {
        Ok(vigil_testkit::page_of(&self.items, query))
    }

    fn fetch_content(&mut self, id: &ContentId) -> Result<ContentItem, FetchError> {
        self.items
            .iter()
            .find(|item| &item.id == id)
            .cloned()
            .ok_or_else(|| FetchError::NotFound("Content item not found".to_owned()))
    }

    fn fetch_stats(&mut self) -> Result<Stats, FetchError> {
        Ok(vigil_testkit::stats_for(&self.items))
    }
}
